use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Development falls back to the in-memory store without it.
    #[serde(skip_serializing, default)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    #[serde(skip_serializing, default)]
    pub api_secret: String,
    pub api_base: String,
    /// Any image `src` starting with this is treated as already hosted
    pub host_prefix: String,
    pub upload_folder: String,
    pub timeout_secs: u64,
    /// Keep the temporary `src` in content when its upload fails (otherwise the tag is stripped)
    pub keep_unresolved_images: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing, default)]
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Media host overrides
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            self.media.cloud_name = v;
            self.media.host_prefix = format!("https://res.cloudinary.com/{}/", self.media.cloud_name);
        }
        if let Ok(v) = env::var("CLOUDINARY_API_KEY") {
            self.media.api_key = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_SECRET") {
            self.media.api_secret = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_BASE") {
            self.media.api_base = v;
        }
        if let Ok(v) = env::var("MEDIA_HOST_PREFIX") {
            self.media.host_prefix = v;
        }
        if let Ok(v) = env::var("MEDIA_UPLOAD_FOLDER") {
            self.media.upload_folder = v;
        }
        if let Ok(v) = env::var("MEDIA_TIMEOUT_SECS") {
            self.media.timeout_secs = v.parse().unwrap_or(self.media.timeout_secs);
        }
        if let Ok(v) = env::var("MEDIA_KEEP_UNRESOLVED_IMAGES") {
            self.media.keep_unresolved_images = v.parse().unwrap_or(self.media.keep_unresolved_images);
        }

        // API overrides
        if let Some(port) = env::var("QUILL_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            media: MediaConfig::default(),
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB, posts carry inline data URIs
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: String::new(),
                jwt_audience: None,
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            media: MediaConfig {
                timeout_secs: 30,
                ..MediaConfig::default()
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 20 * 1024 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                jwt_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            media: MediaConfig {
                timeout_secs: 20,
                ..MediaConfig::default()
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 15 * 1024 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                jwt_expiry_hours: 4,
            },
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base: "https://api.cloudinary.com".to_string(),
            host_prefix: "https://res.cloudinary.com/".to_string(),
            upload_folder: "quill/posts".to_string(),
            timeout_secs: 60,
            keep_unresolved_images: true,
        }
    }
}
