use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Post, PostDraft, Profile};
use crate::database::repository::ContentStore;

const POST_COLUMNS: &str =
    "id, author_id, title, content, category, cover_photo, published, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, display_name, avatar_url, updated_at";

/// Content store backed by the `posts` and `profiles` tables (see sql/schema.sql)
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn post_not_found(id: Uuid) -> DatabaseError {
        DatabaseError::NotFound(format!("post {} not found", id))
    }
}

#[async_trait]
impl ContentStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_post(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1 AND author_id = $2", POST_COLUMNS);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM posts WHERE author_id = $1 ORDER BY created_at",
            POST_COLUMNS
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError> {
        let sql = format!(
            "INSERT INTO posts (id, author_id, title, content, category, cover_photo, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(author_id)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(&draft.category)
            .bind(draft.cover_photo.as_deref())
            .bind(draft.published)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, author_id: Uuid, draft: &PostDraft) -> Result<Post, DatabaseError> {
        let sql = format!(
            "UPDATE posts
             SET title = $3, content = $4, category = $5, cover_photo = $6, published = $7, updated_at = now()
             WHERE id = $1 AND author_id = $2
             RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(author_id)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(&draft.category)
            .bind(draft.cover_photo.as_deref())
            .bind(draft.published)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::post_not_found(id))
    }

    async fn update_post_media(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        cover_photo: Option<&str>,
    ) -> Result<Post, DatabaseError> {
        let sql = format!(
            "UPDATE posts
             SET content = $3, cover_photo = $4, updated_at = now()
             WHERE id = $1 AND author_id = $2
             RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(author_id)
            .bind(content)
            .bind(cover_photo)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::post_not_found(id))
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<Post, DatabaseError> {
        let sql = format!(
            "DELETE FROM posts WHERE id = $1 AND author_id = $2 RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::post_not_found(id))
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn set_avatar(&self, user_id: Uuid, avatar_url: Option<&str>) -> Result<Profile, DatabaseError> {
        let sql = format!(
            "INSERT INTO profiles (id, avatar_url) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET avatar_url = EXCLUDED.avatar_url, updated_at = now()
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(avatar_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn delete_account(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM posts WHERE author_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
