// Test doubles for the media host and content store

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::{DatabaseError, Post, PostDraft, Profile};
use crate::database::ContentStore;
use crate::media::{MediaError, MediaHost, UploadedImage};

/// Host prefix the fakes hand out URLs under
pub const HOST: &str = "https://res.cloudinary.com/demo/";

/// Hosted URL inside `author`'s folder under the default upload root
pub fn owned_url(author: Uuid, name: &str) -> String {
    format!("{}image/upload/v1/quill/posts/{}/{}.png", HOST, author, name)
}

/// Media host that records calls and fails on request
#[derive(Default)]
pub struct FakeMediaHost {
    counter: AtomicUsize,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    failing_uploads: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upload(&self, source: &str) {
        self.failing_uploads.lock().unwrap().insert(source.to_string());
    }

    pub fn fail_delete(&self, url: &str) {
        self.failing_deletes.lock().unwrap().insert(url.to_string());
    }

    /// Sources of successful uploads, in call order
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// URLs of successful deletions, in call order
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedImage, MediaError> {
        if self.failing_uploads.lock().unwrap().contains(source) {
            return Err(MediaError::UploadRejected(format!("refused {}", source)));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.uploads.lock().unwrap().push(source.to_string());
        Ok(UploadedImage {
            url: format!("{}image/upload/v1/{}/{}.png", HOST, folder, n),
            public_id: format!("{}/{}", folder, n),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        if self.failing_deletes.lock().unwrap().contains(url) {
            return Err(MediaError::DeleteRejected(url.to_string()));
        }
        self.deletes.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Store whose every call fails, for fatal persistence paths
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn failure() -> DatabaseError {
        DatabaseError::QueryError("connection reset".to_string())
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(Self::failure())
    }

    async fn find_post(&self, _id: Uuid, _author_id: Uuid) -> Result<Option<Post>, DatabaseError> {
        Err(Self::failure())
    }

    async fn list_posts(&self, _author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        Err(Self::failure())
    }

    async fn insert_post(&self, _author_id: Uuid, _draft: &PostDraft) -> Result<Post, DatabaseError> {
        Err(Self::failure())
    }

    async fn update_post(&self, _id: Uuid, _author_id: Uuid, _draft: &PostDraft) -> Result<Post, DatabaseError> {
        Err(Self::failure())
    }

    async fn update_post_media(
        &self,
        _id: Uuid,
        _author_id: Uuid,
        _content: &str,
        _cover_photo: Option<&str>,
    ) -> Result<Post, DatabaseError> {
        Err(Self::failure())
    }

    async fn delete_post(&self, _id: Uuid, _author_id: Uuid) -> Result<Post, DatabaseError> {
        Err(Self::failure())
    }

    async fn find_profile(&self, _user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Err(Self::failure())
    }

    async fn set_avatar(&self, _user_id: Uuid, _avatar_url: Option<&str>) -> Result<Profile, DatabaseError> {
        Err(Self::failure())
    }

    async fn delete_account(&self, _user_id: Uuid) -> Result<(), DatabaseError> {
        Err(Self::failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_host_hands_out_hosted_urls() {
        let media = FakeMediaHost::new();
        let first = media.upload("data:a", "quill/posts/u1").await.unwrap();
        let second = media.upload("data:b", "quill/posts/u1").await.unwrap();

        assert!(first.url.starts_with(HOST));
        assert_eq!(first.public_id, "quill/posts/u1/0");
        assert_eq!(media.public_id(&first.url).as_deref(), Some("quill/posts/u1/0"));
        assert_ne!(first.url, second.url);
        assert_eq!(media.uploads(), vec!["data:a".to_string(), "data:b".to_string()]);
    }

    #[tokio::test]
    async fn fake_host_fails_on_request() {
        let media = FakeMediaHost::new();
        media.fail_upload("data:bad");
        media.fail_delete("hostA/1");

        assert!(media.upload("data:bad", "quill/posts/u1").await.is_err());
        assert!(media.delete("hostA/1").await.is_err());
        assert!(media.uploads().is_empty());
        assert!(media.deletes().is_empty());
    }
}
