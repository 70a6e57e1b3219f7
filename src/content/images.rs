// Image reference handling for rich-text post content
//
// Content is never parsed as a DOM. Every operation here walks `<img>` tags
// with the same pattern so that scanning, removal and rewriting agree on what
// counts as an image.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use serde::{Deserialize, Serialize};

/// Matches a whole `<img ...>` tag with a non-empty, quoted `src` value.
/// Quoted attribute values are stepped over whole, so a `>` inside one does
/// not end the tag. Group 1 holds a double-quoted value, group 2 a single-quoted one.
static IMG_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)<img\b(?:[^>"']|"[^"]*"|'[^']*')*?"#,
        r#"\ssrc\s*=\s*(?:"([^"]+)"|'([^']+)')"#,
        r#"(?:[^>"']|"[^"]*"|'[^']*')*>"#,
    ))
    .expect("Invalid img tag regex")
});

/// Image sources found in a piece of content, split by where they live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRefs {
    /// Temporary references (data URIs, blob URLs, foreign URLs) not yet uploaded
    pub new: Vec<String>,
    /// References already stored on the media host
    pub existing: Vec<String>,
}

/// Pairs a temporary reference with the URL the media host stored it under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPair {
    pub original: String,
    pub hosted_url: String,
}

impl UploadPair {
    pub fn new(original: impl Into<String>, hosted_url: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            hosted_url: hosted_url.into(),
        }
    }
}

fn src_match<'h>(caps: &Captures<'h>) -> Option<Match<'h>> {
    caps.get(1).or_else(|| caps.get(2))
}

/// All `src` values in document order, duplicates included
pub fn image_sources(content: &str) -> Vec<&str> {
    IMG_TAG
        .captures_iter(content)
        .filter_map(|caps| src_match(&caps).map(|m| m.as_str()))
        .collect()
}

/// Whether `src` points at the media host (prefix match only)
pub fn is_hosted(src: &str, host_prefix: &str) -> bool {
    !host_prefix.is_empty() && src.starts_with(host_prefix)
}

/// Partition every image `src` in `content` into new and existing references
pub fn scan_images(content: &str, host_prefix: &str) -> ImageRefs {
    let mut refs = ImageRefs::default();
    for src in image_sources(content) {
        if is_hosted(src, host_prefix) {
            refs.existing.push(src.to_string());
        } else {
            refs.new.push(src.to_string());
        }
    }
    refs
}

/// Hosted references present before but gone now, in their previous order
pub fn find_orphans<P, C>(previous: &[P], current: &[C]) -> Vec<String>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let keep: HashSet<&str> = current.iter().map(AsRef::as_ref).collect();
    let mut seen = HashSet::new();
    previous
        .iter()
        .map(AsRef::as_ref)
        .filter(|src| !keep.contains(src))
        .filter(|src| seen.insert(*src))
        .map(str::to_string)
        .collect()
}

/// Drop every `<img>` tag whose `src` is one of `references`
pub fn remove_images<S: AsRef<str>>(content: &str, references: &[S]) -> String {
    if references.is_empty() {
        return content.to_string();
    }

    let targets: HashSet<&str> = references.iter().map(AsRef::as_ref).collect();
    IMG_TAG
        .replace_all(content, |caps: &Captures| match src_match(caps) {
            Some(src) if targets.contains(src.as_str()) => String::new(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Point every `<img>` whose `src` matches a pair's original at its hosted URL
pub fn replace_images(content: &str, pairs: &[UploadPair]) -> String {
    if pairs.is_empty() {
        return content.to_string();
    }

    let lookup: HashMap<&str, &str> = pairs
        .iter()
        .map(|pair| (pair.original.as_str(), pair.hosted_url.as_str()))
        .collect();

    IMG_TAG
        .replace_all(content, |caps: &Captures| {
            let tag = &caps[0];
            let tag_start = caps.get(0).map_or(0, |m| m.start());
            match src_match(caps).and_then(|src| lookup.get(src.as_str()).map(|url| (src, *url))) {
                Some((src, url)) => {
                    let start = src.start() - tag_start;
                    let end = src.end() - tag_start;
                    format!("{}{}{}", &tag[..start], url, &tag[end..])
                }
                None => tag.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://res.cloudinary.com/";

    #[test]
    fn scans_data_uri_as_new() {
        let refs = scan_images(r#"<p>hi <img src="data:base64,xyz"></p>"#, HOST);
        assert_eq!(refs.new, vec!["data:base64,xyz"]);
        assert!(refs.existing.is_empty());
    }

    #[test]
    fn scans_hosted_url_as_existing() {
        let refs = scan_images(r#"<img src="https://res.cloudinary.com/abc/img1.png">"#, HOST);
        assert_eq!(refs.existing, vec!["https://res.cloudinary.com/abc/img1.png"]);
        assert!(refs.new.is_empty());
    }

    #[test]
    fn counts_every_hosted_image() {
        let content = (0..5)
            .map(|i| format!(r#"<p>{i}</p><img alt="x" src="{HOST}demo/{i}.png" width="20">"#))
            .collect::<String>();
        let refs = scan_images(&content, HOST);
        assert_eq!(refs.existing.len(), 5);
        assert!(refs.new.is_empty());
    }

    #[test]
    fn counts_every_foreign_image() {
        let content = r#"<img src="blob:http://localhost/1"><img src='data:image/png;base64,AAA='><img src="https://example.com/a.png">"#;
        let refs = scan_images(content, HOST);
        assert_eq!(refs.new.len(), 3);
        assert!(refs.existing.is_empty());
    }

    #[test]
    fn keeps_document_order_and_duplicates() {
        let content = format!(
            r#"<img src="data:a"><img src="{HOST}x/1.png"><img src="data:a"><img src="{HOST}x/1.png">"#
        );
        let refs = scan_images(&content, HOST);
        assert_eq!(refs.new, vec!["data:a", "data:a"]);
        assert_eq!(refs.existing.len(), 2);
    }

    #[test]
    fn steps_over_gt_inside_quoted_attributes() {
        let content = format!(
            r#"<img alt="a > b" src="data:x"><img title='1 > 0' src="{HOST}x/1.png" data-note="c > d">"#
        );
        let refs = scan_images(&content, HOST);
        assert_eq!(refs.new, vec!["data:x"]);
        assert_eq!(refs.existing, vec![format!("{HOST}x/1.png")]);

        let pairs = [UploadPair::new("data:x", format!("{HOST}x/2.png"))];
        assert_eq!(
            replace_images(&content, &pairs),
            format!(
                r#"<img alt="a > b" src="{HOST}x/2.png"><img title='1 > 0' src="{HOST}x/1.png" data-note="c > d">"#
            )
        );
        assert_eq!(
            remove_images(&content, &[format!("{HOST}x/1.png")]),
            r#"<img alt="a > b" src="data:x">"#
        );
    }

    #[test]
    fn skips_images_without_usable_src() {
        let content = r#"<img alt="none"><img src=""><img data-src="data:lazy"><p>src="data:text"</p>"#;
        let refs = scan_images(content, HOST);
        assert_eq!(refs, ImageRefs::default());
    }

    #[test]
    fn hosted_prefix_with_query_is_existing() {
        let url = format!("{HOST}demo/image/upload/v1/a.png?width=300#frag");
        let refs = scan_images(&format!(r#"<IMG class="wide" SRC="{url}" />"#), HOST);
        assert_eq!(refs.existing, vec![url]);
    }

    #[test]
    fn orphans_are_previous_minus_current() {
        let previous = vec!["hostA/1".to_string(), "hostA/2".to_string()];
        let current = vec!["hostA/1".to_string()];
        assert_eq!(find_orphans(&previous, &current), vec!["hostA/2"]);
        assert!(find_orphans(&previous, &previous).is_empty());
        assert!(find_orphans::<String, String>(&[], &current).is_empty());
    }

    #[test]
    fn orphans_are_deduplicated() {
        let previous = ["hostA/2", "hostA/1", "hostA/2"];
        let orphans = find_orphans(&previous, &[] as &[&str]);
        assert_eq!(orphans, vec!["hostA/2", "hostA/1"]);
    }

    #[test]
    fn removes_only_orphaned_tags() {
        let content = r#"<p>a</p><img src="hostA/1"><p>b <img class="x" src="hostA/2" alt="two"> c</p>"#;
        let cleaned = remove_images(content, &["hostA/2"]);
        assert_eq!(cleaned, r#"<p>a</p><img src="hostA/1"><p>b  c</p>"#);
    }

    #[test]
    fn removal_is_idempotent() {
        let content = r#"<img src="hostA/1"><img src="hostA/2"><img src="hostA/2">"#;
        let once = remove_images(content, &["hostA/2"]);
        let twice = remove_images(&once, &["hostA/2"]);
        assert_eq!(once, r#"<img src="hostA/1">"#);
        assert_eq!(once, twice);
    }

    #[test]
    fn removal_matches_exact_src_only() {
        let content = r#"<img src="hostA/10"><img src="hostA/1">"#;
        assert_eq!(remove_images(content, &["hostA/1"]), r#"<img src="hostA/10">"#);
    }

    #[test]
    fn rewrites_uploaded_reference() {
        let pairs = vec![UploadPair::new("data:xyz", "hostA/3")];
        let rewritten = replace_images(r#"<p><img src="data:xyz"></p>"#, &pairs);
        assert_eq!(rewritten, r#"<p><img src="hostA/3"></p>"#);
        assert!(!rewritten.contains("data:xyz"));
    }

    #[test]
    fn rewrite_preserves_other_attributes_and_quotes() {
        let pairs = vec![UploadPair::new("data:one", "hostA/1")];
        let content = r#"<img width='10' src='data:one' alt='x'><img src="hostA/9">"#;
        assert_eq!(
            replace_images(content, &pairs),
            r#"<img width='10' src='hostA/1' alt='x'><img src="hostA/9">"#
        );
    }

    #[test]
    fn rewrite_replaces_every_occurrence() {
        let pairs = vec![UploadPair::new("data:dup", "hostA/7")];
        let rewritten = replace_images(r#"<img src="data:dup"><img src="data:dup">"#, &pairs);
        assert_eq!(rewritten, r#"<img src="hostA/7"><img src="hostA/7">"#);
    }

    #[test]
    fn rewrite_of_absent_reference_is_noop() {
        let content = r#"<p>text</p><img src="hostA/1">"#;
        let pairs = vec![UploadPair::new("data:missing", "hostA/2")];
        assert_eq!(replace_images(content, &pairs), content);
    }

    #[test]
    fn text_outside_tags_is_untouched() {
        let content = r#"data:xyz <img src="data:xyz"> data:xyz"#;
        let pairs = vec![UploadPair::new("data:xyz", "hostA/3")];
        assert_eq!(replace_images(content, &pairs), r#"data:xyz <img src="hostA/3"> data:xyz"#);
    }
}
