//! Configuration module
//!
//! Server configuration is read from the environment (a `.env` file is honoured)
//! and validated once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_ISSUER: &str = "tubely-access";
const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30;
const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 10 << 20;
const SIGNED_URL_TTL_SECS: u64 = 1000;
const LOCAL_STORAGE_BUCKET: &str = "tubely-local";

/// Settings every deployment needs regardless of storage backend
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub environment: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_storage_bucket: String,
    pub local_storage_signing_secret: Option<String>,
    // Media pipeline
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub staging_dir: Option<PathBuf>,
    pub max_video_upload_bytes: usize,
    pub max_thumbnail_upload_bytes: usize,
    pub signed_url_ttl_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServerConfig>);

impl Config {
    fn inner(&self) -> &ServerConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.inner().base.jwt_issuer
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn local_storage_bucket(&self) -> &str {
        &self.inner().local_storage_bucket
    }

    /// Secret used to sign local asset URLs; falls back to the JWT secret.
    pub fn local_storage_signing_secret(&self) -> &str {
        self.inner()
            .local_storage_signing_secret
            .as_deref()
            .unwrap_or(&self.inner().base.jwt_secret)
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn staging_dir(&self) -> Option<&PathBuf> {
        self.inner().staging_dir.as_ref()
    }

    pub fn max_video_upload_bytes(&self) -> usize {
        self.inner().max_video_upload_bytes
    }

    pub fn max_thumbnail_upload_bytes(&self) -> usize {
        self.inner().max_thumbnail_upload_bytes
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().signed_url_ttl_secs)
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| JWT_ISSUER.to_string()),
            environment,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => Some(value.parse::<StorageBackend>()?),
            Err(_) => None,
        };

        let config = ServerConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            local_storage_bucket: env::var("LOCAL_STORAGE_BUCKET")
                .unwrap_or_else(|_| LOCAL_STORAGE_BUCKET.to_string()),
            local_storage_signing_secret: env::var("LOCAL_STORAGE_SIGNING_SECRET").ok(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            staging_dir: env::var("STAGING_DIR").ok().map(PathBuf::from),
            max_video_upload_bytes: env::var("MAX_VIDEO_UPLOAD_BYTES")
                .unwrap_or_else(|_| MAX_VIDEO_UPLOAD_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_VIDEO_UPLOAD_BYTES),
            max_thumbnail_upload_bytes: env::var("MAX_THUMBNAIL_UPLOAD_BYTES")
                .unwrap_or_else(|_| MAX_THUMBNAIL_UPLOAD_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_THUMBNAIL_UPLOAD_BYTES),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.signed_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("SIGNED_URL_TTL_SECS must be greater than 0"));
        }

        if self.max_video_upload_bytes == 0 || self.max_thumbnail_upload_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size ceilings must be greater than 0"));
        }

        if let Some(dir) = &self.staging_dir {
            if !dir.is_dir() {
                return Err(anyhow::anyhow!(
                    "STAGING_DIR {} is not an existing directory",
                    dir.display()
                ));
            }
        }

        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
                if self.local_storage_bucket.contains(',') || self.local_storage_bucket.is_empty()
                {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BUCKET must be non-empty and must not contain ','"
                    ));
                }
            }
        }

        Ok(())
    }
}
