// Media host integration: the seam the reconciler talks to, plus the Cloudinary client

pub mod cloudinary;
pub mod signature;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use cloudinary::{public_id_from_url, CloudinaryClient};
pub use signature::{sign_params, SignedUpload};

/// Errors from the media host, already stripped of provider-specific shapes
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media host not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("Not a hosted image: {0}")]
    NotHosted(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Delete rejected: {0}")]
    DeleteRejected(String),

    #[error("Unexpected response from media host: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A stored image as reported by the media host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// Remote image storage used by post and profile reconciliation
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Store an image given as a data URI or fetchable URL under `folder`
    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedImage, MediaError>;

    /// Remove a previously stored image by its hosted URL
    async fn delete(&self, url: &str) -> Result<(), MediaError>;

    /// Public id (folder path plus name) of a hosted URL
    fn public_id(&self, url: &str) -> Option<String> {
        public_id_from_url(url)
    }
}

/// Folder an account's images are uploaded to: `{root}/{author_id}`
pub fn author_folder(root: &str, author_id: Uuid) -> String {
    format!("{}/{}", root.trim_end_matches('/'), author_id)
}
