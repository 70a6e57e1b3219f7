use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::MediaConfig;
use crate::media::MediaError;

/// Sign request parameters the way the upload API expects:
/// sorted `key=value` pairs joined with `&`, secret appended, SHA-256 hex.
/// Empty values are left out of the signature.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Upload capability handed to clients that upload straight to the media host
#[derive(Debug, Clone, Serialize)]
pub struct SignedUpload {
    pub upload_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub folder: String,
    pub timestamp: i64,
    pub signature: String,
}

impl SignedUpload {
    pub fn new(config: &MediaConfig, folder: &str, timestamp: i64) -> Result<Self, MediaError> {
        ensure_credentials(config)?;

        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("timestamp", timestamp.to_string());

        Ok(Self {
            upload_url: upload_endpoint(config, "upload"),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            folder: folder.to_string(),
            timestamp,
            signature: sign_params(&params, &config.api_secret),
        })
    }
}

pub(crate) fn upload_endpoint(config: &MediaConfig, action: &str) -> String {
    format!(
        "{}/v1_1/{}/image/{}",
        config.api_base.trim_end_matches('/'),
        config.cloud_name,
        action
    )
}

pub(crate) fn ensure_credentials(config: &MediaConfig) -> Result<(), MediaError> {
    if config.cloud_name.is_empty() {
        return Err(MediaError::NotConfigured("CLOUDINARY_CLOUD_NAME"));
    }
    if config.api_key.is_empty() {
        return Err(MediaError::NotConfigured("CLOUDINARY_API_KEY"));
    }
    if config.api_secret.is_empty() {
        return Err(MediaError::NotConfigured("CLOUDINARY_API_SECRET"));
    }
    Ok(())
}
