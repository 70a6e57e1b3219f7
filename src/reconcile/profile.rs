use tracing::info;
use uuid::Uuid;

use crate::content::UploadPair;
use crate::media::author_folder;
use crate::reconcile::report::StageTracker;
use crate::reconcile::{DeleteReport, ProfileReport, ReconcileError, Reconciler, SaveStage};

impl Reconciler {
    /// Store a new profile photo and drop the previous hosted one.
    ///
    /// Unlike post images, a failed upload is fatal here: there is no
    /// content to keep the temporary reference in.
    pub async fn replace_profile_photo(&self, user_id: Uuid, source: &str) -> Result<ProfileReport, ReconcileError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ReconcileError::InvalidInput("photo must not be empty".to_string()));
        }

        let previous = self
            .store
            .find_profile(user_id)
            .await?
            .and_then(|profile| profile.avatar_url);

        let uploaded = if self.is_hosted(source) {
            None
        } else {
            let folder = author_folder(&self.upload_folder, user_id);
            let image = self.media.upload(source, &folder).await?;
            Some(UploadPair::new(source, image.url))
        };
        let avatar_url = uploaded
            .as_ref()
            .map_or(source, |pair| pair.hosted_url.as_str());

        let profile = self.store.set_avatar(user_id, Some(avatar_url)).await?;
        info!("Profile photo of {} set to {}", user_id, avatar_url);

        let stale: Vec<String> = previous
            .into_iter()
            .filter(|url| self.is_hosted(url) && url != avatar_url)
            .collect();

        let mut tracker = StageTracker::new();
        tracker.enter(SaveStage::DeletingOrphans);
        let deleted = self.delete_all(&stale, user_id, &mut tracker).await;
        let (_, warnings) = tracker.into_parts();

        Ok(ProfileReport {
            profile,
            uploaded,
            deleted,
            warnings,
        })
    }

    /// Clear the profile photo and delete it from the media host
    pub async fn remove_profile_photo(&self, user_id: Uuid) -> Result<ProfileReport, ReconcileError> {
        let previous = self
            .store
            .find_profile(user_id)
            .await?
            .ok_or_else(|| ReconcileError::NotFound(format!("profile {} not found", user_id)))?
            .avatar_url;

        let profile = self.store.set_avatar(user_id, None).await?;

        let stale: Vec<String> = previous.into_iter().filter(|url| self.is_hosted(url)).collect();
        let mut tracker = StageTracker::new();
        tracker.enter(SaveStage::DeletingOrphans);
        let deleted = self.delete_all(&stale, user_id, &mut tracker).await;
        let (_, warnings) = tracker.into_parts();

        Ok(ProfileReport {
            profile,
            uploaded: None,
            deleted,
            warnings,
        })
    }

    /// Delete the profile and all posts, then every hosted image they used
    pub async fn delete_account(&self, user_id: Uuid) -> Result<DeleteReport, ReconcileError> {
        let posts = self.store.list_posts(user_id).await?;
        let avatar = self
            .store
            .find_profile(user_id)
            .await?
            .and_then(|profile| profile.avatar_url);

        let mut images: Vec<String> = posts.iter().flat_map(|post| self.hosted_images_of(post)).collect();
        images.extend(avatar.filter(|url| self.is_hosted(url)));
        let images = super::dedup(images);

        self.store.delete_account(user_id).await?;
        info!(
            "Deleted account {} with {} posts, removing {} hosted images",
            user_id,
            posts.len(),
            images.len()
        );

        let mut tracker = StageTracker::new();
        tracker.enter(SaveStage::DeletingOrphans);
        let deleted = self.delete_all(&images, user_id, &mut tracker).await;
        let (_, warnings) = tracker.into_parts();

        Ok(DeleteReport { deleted, warnings })
    }
}
