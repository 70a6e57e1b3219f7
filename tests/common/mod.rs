#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use quill_api_rust::auth::{generate_jwt, Claims};
use quill_api_rust::config::AppConfig;
use quill_api_rust::database::MemoryStore;
use quill_api_rust::media::{MediaError, MediaHost, UploadedImage};
use quill_api_rust::{app, AppState};

pub const HOST: &str = "https://res.cloudinary.com/test/";
pub const JWT_SECRET: &str = "integration-secret";

/// Media host that records calls instead of talking to Cloudinary
#[derive(Default)]
pub struct RecordingMediaHost {
    counter: AtomicUsize,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    refused: Mutex<HashSet<String>>,
}

impl RecordingMediaHost {
    pub fn refuse_upload(&self, source: &str) {
        self.refused.lock().unwrap().insert(source.to_string());
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for RecordingMediaHost {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedImage, MediaError> {
        if self.refused.lock().unwrap().contains(source) {
            return Err(MediaError::UploadRejected("Invalid image file".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.uploads.lock().unwrap().push(source.to_string());
        Ok(UploadedImage {
            url: format!("{}image/upload/v1/{}/{}.png", HOST, folder, n),
            public_id: format!("{}/{}", folder, n),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        self.deletes.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub media: Arc<RecordingMediaHost>,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Fresh app on its own port with an in-memory store
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let media = Arc::new(RecordingMediaHost::default());
        let state = AppState::new(config, Arc::new(MemoryStore::new()), media.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            media,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.media.host_prefix = HOST.to_string();
    config.media.cloud_name = "test".to_string();
    config.media.api_key = "123456".to_string();
    config.media.api_secret = "shhh".to_string();
    config
}

/// Bearer token for `user` signed with the test secret
pub fn token_for(user: Uuid) -> String {
    let security = test_config().security;
    generate_jwt(&Claims::new(user, None, &security), &security).expect("token")
}

/// Hosted URL inside `user`'s upload folder
pub fn hosted_url(user: Uuid, name: &str) -> String {
    format!("{}image/upload/v1/quill/posts/{}/{}.png", HOST, user, name)
}

pub fn data_uri(tag: &str) -> String {
    format!("data:image/png;base64,{}", tag)
}
