use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::MediaConfig;
use crate::content::is_hosted;
use crate::media::signature::{ensure_credentials, sign_params, upload_endpoint};
use crate::media::{MediaError, MediaHost, UploadedImage};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Signed upload/destroy client for the Cloudinary image API
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl CloudinaryClient {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        ensure_credentials(&config)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Signed form for an API call; `params` are the fields covered by the signature
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &self.config.api_secret);
        params.insert("signature", signature);
        params.insert("api_key", self.config.api_key.clone());
        params
    }

    async fn rejection(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("status {}", status),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedImage, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        let mut form = self.signed_form(params);
        form.insert("file", source.to_string());

        let response = self
            .http
            .post(upload_endpoint(&self.config, "upload"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::UploadRejected(Self::rejection(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        info!("Uploaded image as {}", body.public_id);
        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        if !is_hosted(url, &self.config.host_prefix) {
            return Err(MediaError::NotHosted(url.to_string()));
        }
        let public_id =
            public_id_from_url(url).ok_or_else(|| MediaError::NotHosted(url.to_string()))?;

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.clone());
        let form = self.signed_form(params);

        let response = self
            .http
            .post(upload_endpoint(&self.config, "destroy"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::DeleteRejected(Self::rejection(response).await));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" => {
                info!("Deleted image {}", public_id);
                Ok(())
            }
            // Already gone, which is the state we wanted
            "not found" => {
                debug!("Image {} was already deleted", public_id);
                Ok(())
            }
            other => Err(MediaError::DeleteRejected(format!("{}: {}", public_id, other))),
        }
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

/// Public id of a delivery URL such as
/// `https://res.cloudinary.com/demo/image/upload/w_300/v1712/quill/posts/cat.png` → `quill/posts/cat`
pub fn public_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    let upload_at = segments.iter().position(|s| *s == "upload")?;
    let rest = &segments[upload_at + 1..];
    let rest = match rest.iter().position(|s| is_version_segment(s)) {
        Some(version_at) => &rest[version_at + 1..],
        None => rest,
    };

    let (last, dirs) = rest.split_last()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => last,
    };

    let mut parts = dirs.to_vec();
    parts.push(stem);
    Some(parts.join("/"))
}
