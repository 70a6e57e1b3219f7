use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, PostDraft, Profile};

/// Persistence for posts and profiles.
///
/// Every post operation is scoped to its author: a post owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn find_post(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, DatabaseError>;

    async fn list_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError>;

    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError>;

    /// Overwrite every editable field. `NotFound` if the post is missing.
    async fn update_post(&self, id: Uuid, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError>;

    /// Store rewritten content and cover photo after uploads
    async fn update_post_media(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        cover_photo: Option<&str>,
    ) -> Result<Post, DatabaseError>;

    /// Returns the deleted post. `NotFound` if the post is missing.
    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<Post, DatabaseError>;

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError>;

    /// Upserts the profile row
    async fn set_avatar(&self, user_id: Uuid, avatar_url: Option<&str>) -> Result<Profile, DatabaseError>;

    /// Remove the profile and every post of the user
    async fn delete_account(&self, user_id: Uuid) -> Result<(), DatabaseError>;
}
