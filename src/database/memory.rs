use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, PostDraft, Profile};
use crate::database::repository::ContentStore;

/// In-process content store for development runs without Postgres and for tests
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn post_not_found(id: Uuid) -> DatabaseError {
        DatabaseError::NotFound(format!("post {} not found", id))
    }

    /// Mutable access to an owned post, `NotFound` otherwise
    fn owned_mut(posts: &mut HashMap<Uuid, Post>, id: Uuid, author_id: Uuid) -> Result<&mut Post, DatabaseError> {
        posts
            .get_mut(&id)
            .filter(|post| post.author_id == author_id)
            .ok_or_else(|| Self::post_not_found(id))
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_post(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).filter(|post| post.author_id == author_id).cloned())
    }

    async fn list_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        let posts = self.posts.read().await;
        let mut owned: Vec<Post> = posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect();
        owned.sort_by_key(|post| post.created_at);
        Ok(owned)
    }

    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            category: draft.category.clone(),
            cover_photo: draft.cover_photo.clone(),
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError> {
        let mut posts = self.posts.write().await;
        let post = Self::owned_mut(&mut posts, id, author_id)?;
        post.title = draft.title.clone();
        post.content = draft.content.clone();
        post.category = draft.category.clone();
        post.cover_photo = draft.cover_photo.clone();
        post.published = draft.published;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn update_post_media(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        cover_photo: Option<&str>,
    ) -> Result<Post, DatabaseError> {
        let mut posts = self.posts.write().await;
        let post = Self::owned_mut(&mut posts, id, author_id)?;
        post.content = content.to_string();
        post.cover_photo = cover_photo.map(str::to_string);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<Post, DatabaseError> {
        let mut posts = self.posts.write().await;
        Self::owned_mut(&mut posts, id, author_id)?;
        posts.remove(&id).ok_or_else(|| Self::post_not_found(id))
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn set_avatar(&self, user_id: Uuid, avatar_url: Option<&str>) -> Result<Profile, DatabaseError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_insert_with(|| Profile {
            id: user_id,
            display_name: None,
            avatar_url: None,
            updated_at: Utc::now(),
        });
        profile.avatar_url = avatar_url.map(str::to_string);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn delete_account(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        self.posts.write().await.retain(|_, post| post.author_id != user_id);
        self.profiles.write().await.remove(&user_id);
        Ok(())
    }
}
