use tracing::{info, warn};
use uuid::Uuid;

use crate::content::{find_orphans, remove_images, replace_images, scan_images};
use crate::database::{Post, PostDraft};
use crate::reconcile::report::StageTracker;
use crate::reconcile::{dedup, ReconcileError, Reconciler, SaveReport, SaveStage};

impl Reconciler {
    /// Create a post, uploading any embedded temporary images
    pub async fn create_post(&self, author_id: Uuid, draft: PostDraft) -> Result<SaveReport, ReconcileError> {
        self.save_post(author_id, None, draft).await
    }

    /// Update a post, uploading new images and deleting the ones it no longer uses
    pub async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        draft: PostDraft,
    ) -> Result<SaveReport, ReconcileError> {
        let previous = self
            .store
            .find_post(post_id, author_id)
            .await?
            .ok_or_else(|| ReconcileError::NotFound(format!("post {} not found", post_id)))?;

        self.save_post(author_id, Some(previous), draft).await
    }

    async fn save_post(
        &self,
        author_id: Uuid,
        previous: Option<Post>,
        mut draft: PostDraft,
    ) -> Result<SaveReport, ReconcileError> {
        let mut tracker = StageTracker::new();

        tracker.enter(SaveStage::ExtractingDiff);
        let current = scan_images(&draft.content, &self.host_prefix);
        let new_cover = draft.cover_photo.clone().filter(|c| !c.is_empty());
        let orphans = match &previous {
            Some(prev) => {
                let before = self.hosted_images_of(prev);
                let mut still_used = current.existing.clone();
                still_used.extend(new_cover.iter().cloned());
                find_orphans(&before, &still_used)
            }
            None => Vec::new(),
        };
        draft.content = remove_images(&draft.content, &orphans);
        draft.cover_photo = new_cover.clone();

        tracker.enter(SaveStage::PersistingPost);
        let stored = match &previous {
            Some(prev) => self.store.update_post(prev.id, author_id, &draft).await?,
            None => self.store.insert_post(author_id, &draft).await?,
        };
        info!(
            "Persisted post {} ({} new images, {} orphans)",
            stored.id,
            current.new.len(),
            orphans.len()
        );

        tracker.enter(SaveStage::UploadingImages);
        let pending_cover = new_cover.filter(|c| !self.is_hosted(c));
        let mut sources = current.new.clone();
        sources.extend(pending_cover.iter().cloned());
        let (pairs, failed) = self.upload_all(&dedup(sources), author_id, &mut tracker).await;

        tracker.enter(SaveStage::RewritingContent);
        let mut content = replace_images(&stored.content, &pairs);
        if !self.keep_unresolved_images && !failed.is_empty() {
            content = remove_images(&content, &failed);
        }
        let cover_photo = match pending_cover {
            Some(source) => match pairs.iter().find(|pair| pair.original == source) {
                Some(pair) => Some(pair.hosted_url.clone()),
                None if self.keep_unresolved_images => Some(source),
                None => None,
            },
            None => stored.cover_photo.clone(),
        };

        let post = if content != stored.content || cover_photo != stored.cover_photo {
            match self
                .store
                .update_post_media(stored.id, author_id, &content, cover_photo.as_deref())
                .await
            {
                Ok(post) => post,
                Err(e) => {
                    warn!("Failed to store rewritten content for post {}: {}", stored.id, e);
                    tracker.warn(&stored.id.to_string(), e.to_string());
                    stored
                }
            }
        } else {
            stored
        };

        tracker.enter(SaveStage::DeletingOrphans);
        let deleted = self.delete_all(&orphans, author_id, &mut tracker).await;

        tracker.enter(SaveStage::Done);
        let elapsed_ms = tracker.elapsed().as_millis() as u64;
        let (stages, warnings) = tracker.into_parts();

        Ok(SaveReport {
            post,
            stages,
            uploaded: pairs,
            deleted,
            warnings,
            elapsed_ms,
        })
    }
}
