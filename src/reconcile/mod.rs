// Image lifecycle reconciliation for posts and profiles
//
// A save is a linear, best-effort saga: once the record is persisted,
// upload/rewrite/delete problems are collected as warnings instead of
// failing the request. Nothing is rolled back.
//
// Each account uploads into its own folder, and only images inside the
// acting account's folder are ever deleted.

pub mod error;
pub mod report;

mod post_delete;
mod post_save;
mod profile;

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::content::{is_hosted, scan_images, UploadPair};
use crate::database::{ContentStore, Post};
use crate::media::{author_folder, MediaHost};

pub use error::ReconcileError;
pub use report::{preview, DeleteReport, ProfileReport, SaveReport, SaveStage, SaveWarning};

use report::StageTracker;

/// Drives post and profile saves against the content store and the media host
pub struct Reconciler {
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaHost>,
    host_prefix: String,
    upload_folder: String,
    keep_unresolved_images: bool,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ContentStore>, media: Arc<dyn MediaHost>, config: &MediaConfig) -> Self {
        Self {
            store,
            media,
            host_prefix: config.host_prefix.clone(),
            upload_folder: config.upload_folder.clone(),
            keep_unresolved_images: config.keep_unresolved_images,
        }
    }

    fn is_hosted(&self, src: &str) -> bool {
        is_hosted(src, &self.host_prefix)
    }

    /// Every hosted image a post references, cover photo included, without duplicates
    fn hosted_images_of(&self, post: &Post) -> Vec<String> {
        let mut images = scan_images(&post.content, &self.host_prefix).existing;
        if let Some(cover) = post.cover_photo.as_deref().filter(|c| self.is_hosted(c)) {
            images.push(cover.to_string());
        }
        dedup(images)
    }

    /// Whether a hosted URL lives in the account's upload folder
    fn is_owned_by(&self, url: &str, author_id: Uuid) -> bool {
        let folder = format!("{}/", author_folder(&self.upload_folder, author_id));
        self.media
            .public_id(url)
            .is_some_and(|public_id| public_id.starts_with(&folder))
    }

    /// Upload every source concurrently into the author's folder. Failures become
    /// warnings and are returned alongside the successful pairs.
    async fn upload_all(
        &self,
        sources: &[String],
        author_id: Uuid,
        tracker: &mut StageTracker,
    ) -> (Vec<UploadPair>, Vec<String>) {
        let folder = author_folder(&self.upload_folder, author_id);
        let uploads = sources.iter().map(|source| {
            let folder = folder.as_str();
            async move {
                let result = self.media.upload(source, folder).await;
                (source, result)
            }
        });

        let mut pairs = Vec::new();
        let mut failed = Vec::new();
        for (source, result) in join_all(uploads).await {
            match result {
                Ok(uploaded) => {
                    debug!("Uploaded {} to {} as {}", preview(source), self.media.name(), uploaded.url);
                    pairs.push(UploadPair::new(source.clone(), uploaded.url));
                }
                Err(e) => {
                    tracker.warn(source, e.to_string());
                    failed.push(source.clone());
                }
            }
        }
        (pairs, failed)
    }

    /// Delete the author's hosted images one by one, returning the ones that went away.
    /// Images outside the author's folder are left in place with a warning.
    async fn delete_all(&self, urls: &[String], author_id: Uuid, tracker: &mut StageTracker) -> Vec<String> {
        let mut deleted = Vec::new();
        for url in urls {
            if !self.is_owned_by(url, author_id) {
                tracker.warn(url, format!("skipped, not in the upload folder of {}", author_id));
                continue;
            }
            match self.media.delete(url).await {
                Ok(()) => {
                    debug!("Deleted orphan {} from {}", url, self.media.name());
                    deleted.push(url.clone());
                }
                Err(e) => tracker.warn(url, e.to_string()),
            }
        }
        deleted
    }
}

/// Drop repeated entries, keeping the first occurrence
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
