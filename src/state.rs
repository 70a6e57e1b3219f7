use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{ContentStore, DatabaseManager, MemoryStore, PgStore};
use crate::media::{CloudinaryClient, MediaHost};
use crate::reconcile::Reconciler;

/// Shared handler state: configuration, the content store and the reconciler on top of it
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ContentStore>,
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>, media: Arc<dyn MediaHost>) -> Self {
        let reconciler = Reconciler::new(store.clone(), media, &config.media);
        Self {
            config: Arc::new(config),
            store,
            reconciler: Arc::new(reconciler),
        }
    }

    /// Wire up Postgres (or the in-memory store in development) and Cloudinary
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        if config.security.jwt_secret.is_empty() {
            bail!("SECURITY_JWT_SECRET must be set");
        }

        let store: Arc<dyn ContentStore> = match config.database.url {
            Some(_) => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to Postgres")?;
                Arc::new(PgStore::new(pool))
            }
            None if config.is_development() => {
                warn!("DATABASE_URL not set, using the in-memory store");
                Arc::new(MemoryStore::new())
            }
            None => bail!("DATABASE_URL must be set outside development"),
        };

        let media = CloudinaryClient::new(config.media.clone()).context("failed to configure Cloudinary")?;
        info!(
            "Using {} store and {} media host under {}",
            store.name(),
            media.name(),
            config.media.host_prefix
        );

        Ok(Self::new(config, store, Arc::new(media)))
    }
}
