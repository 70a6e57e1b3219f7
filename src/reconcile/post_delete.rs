use tracing::info;
use uuid::Uuid;

use crate::reconcile::report::StageTracker;
use crate::reconcile::{DeleteReport, ReconcileError, Reconciler, SaveStage};

impl Reconciler {
    /// Delete a post, then every hosted image it referenced
    pub async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<DeleteReport, ReconcileError> {
        let post = self.store.delete_post(post_id, author_id).await?;
        let images = self.hosted_images_of(&post);
        info!("Deleted post {}, removing {} hosted images", post.id, images.len());

        let mut tracker = StageTracker::new();
        tracker.enter(SaveStage::DeletingOrphans);
        let deleted = self.delete_all(&images, author_id, &mut tracker).await;
        let (_, warnings) = tracker.into_parts();

        Ok(DeleteReport { deleted, warnings })
    }
}
