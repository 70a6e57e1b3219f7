use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::content::UploadPair;
use crate::database::{Post, Profile};

/// Stages of a single post save, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SaveStage {
    Idle = 0,
    ExtractingDiff = 1,   // Scan old and new content, compute orphans
    PersistingPost = 2,   // Store submitted fields
    UploadingImages = 3,  // Push temporary references to the media host
    RewritingContent = 4, // Swap temporary references for hosted URLs
    DeletingOrphans = 5,  // Remove images nothing references anymore
    Done = 6,
}

/// Non-fatal problem hit while reconciling images
#[derive(Debug, Clone, Serialize)]
pub struct SaveWarning {
    pub stage: SaveStage,
    /// Image reference (shortened) or record the warning is about
    pub reference: String,
    pub message: String,
}

impl SaveWarning {
    pub fn new(stage: SaveStage, reference: &str, message: impl Into<String>) -> Self {
        Self {
            stage,
            reference: preview(reference),
            message: message.into(),
        }
    }
}

/// Outcome of a post create or update
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    pub post: Post,
    pub stages: Vec<SaveStage>,
    pub uploaded: Vec<UploadPair>,
    pub deleted: Vec<String>,
    pub warnings: Vec<SaveWarning>,
    pub elapsed_ms: u64,
}

/// Outcome of a post or account deletion
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub warnings: Vec<SaveWarning>,
}

/// Outcome of a profile photo change
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub profile: Profile,
    pub uploaded: Option<UploadPair>,
    pub deleted: Vec<String>,
    pub warnings: Vec<SaveWarning>,
}

/// Shorten data URIs and long URLs for logs and reports
pub fn preview(reference: &str) -> String {
    const MAX_CHARS: usize = 64;
    if reference.chars().count() <= MAX_CHARS {
        return reference.to_string();
    }
    let head: String = reference.chars().take(MAX_CHARS).collect();
    format!("{}... ({} bytes)", head, reference.len())
}

/// Records stage transitions and warnings while a save runs
#[derive(Debug)]
pub(crate) struct StageTracker {
    current: SaveStage,
    stages: Vec<SaveStage>,
    warnings: Vec<SaveWarning>,
    started: Instant,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: SaveStage::Idle,
            stages: Vec::new(),
            warnings: Vec::new(),
            started: Instant::now(),
        }
    }

    pub(crate) fn enter(&mut self, stage: SaveStage) {
        info!("Post save: {:?} -> {:?}", self.current, stage);
        self.current = stage;
        self.stages.push(stage);
    }

    pub(crate) fn warn(&mut self, reference: &str, message: impl Into<String>) {
        let warning = SaveWarning::new(self.current, reference, message);
        warn!(
            "Post save warning at {:?} for {}: {}",
            warning.stage, warning.reference, warning.message
        );
        self.warnings.push(warning);
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn into_parts(self) -> (Vec<SaveStage>, Vec<SaveWarning>) {
        (self.stages, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_shortens_data_uris() {
        let data_uri = format!("data:image/png;base64,{}", "A".repeat(500));
        let short = preview(&data_uri);
        assert!(short.starts_with("data:image/png;base64,AAAA"));
        assert!(short.ends_with(&format!("({} bytes)", data_uri.len())));
        assert_eq!(preview("hostA/1"), "hostA/1");
    }

    #[test]
    fn tracker_tags_warnings_with_current_stage() {
        let mut tracker = StageTracker::new();
        tracker.enter(SaveStage::UploadingImages);
        tracker.warn("data:x", "boom");
        tracker.enter(SaveStage::DeletingOrphans);
        tracker.warn("hostA/2", "gone");

        let (stages, warnings) = tracker.into_parts();
        assert_eq!(stages, vec![SaveStage::UploadingImages, SaveStage::DeletingOrphans]);
        assert_eq!(warnings[0].stage, SaveStage::UploadingImages);
        assert_eq!(warnings[1].reference, "hostA/2");
    }
}
