#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;
pub mod videos;

use axum::Router;
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::{setup_routes, AppState};
use tubely_core::config::{BaseConfig, ServerConfig};
use tubely_core::{Config, StorageBackend};
use tubely_processing::test_support::ScriptedRunner;
use tubely_storage::LocalStorage;

use storage::MemoryStorage;
use videos::MemoryVideoStore;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_JWT_ISSUER: &str = "tubely-access";
pub const TEST_BUCKET: &str = "tubely-test";

/// Test application wired to in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    /// The same routes, for requests `TestServer` cannot express (streamed bodies).
    pub router: Router,
    pub videos: Arc<MemoryVideoStore>,
    pub storage: Arc<MemoryStorage>,
    pub runner: Arc<ScriptedRunner>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files left in the staging directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        staged_files(self.staging_dir.path())
    }
}

pub fn staged_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read staging dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect()
}

pub fn test_config(staging_dir: &Path) -> ServerConfig {
    ServerConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_issuer: TEST_JWT_ISSUER.to_string(),
            environment: "test".to_string(),
        },
        database_url: "postgres://unused@localhost/tubely".to_string(),
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some(TEST_BUCKET.to_string()),
        s3_region: Some("us-east-1".to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        local_storage_bucket: "tubely-local".to_string(),
        local_storage_signing_secret: None,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        staging_dir: Some(staging_dir.to_path_buf()),
        max_video_upload_bytes: 1 << 20,
        max_thumbnail_upload_bytes: 1 << 20,
        signed_url_ttl_secs: 1000,
    }
}

pub async fn setup_test_app(runner: ScriptedRunner) -> TestApp {
    setup_test_app_with(runner, |_| {}).await
}

/// Like [`setup_test_app`], with a hook to adjust the configuration.
pub async fn setup_test_app_with(
    runner: ScriptedRunner,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create staging dir");
    let mut server_config = test_config(staging_dir.path());
    configure(&mut server_config);
    let config = Config(Box::new(server_config));

    let videos = Arc::new(MemoryVideoStore::default());
    let storage = Arc::new(MemoryStorage::new(TEST_BUCKET));
    let runner = Arc::new(runner);

    let state = AppState::new(
        config.clone(),
        videos.clone(),
        storage.clone(),
        None,
        runner.clone(),
    )
    .expect("Failed to build app state");
    let router = setup_routes(&config, Arc::new(state)).expect("Failed to build routes");

    TestApp {
        server: TestServer::new(router.clone()).expect("Failed to create test server"),
        router,
        videos,
        storage,
        runner,
        staging_dir,
    }
}

/// Test application backed by the local filesystem storage backend.
pub struct LocalTestApp {
    pub server: TestServer,
    pub videos: Arc<MemoryVideoStore>,
    pub _storage_dir: TempDir,
    pub _staging_dir: TempDir,
}

pub async fn setup_local_test_app() -> LocalTestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create staging dir");
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

    let mut server_config = test_config(staging_dir.path());
    server_config.storage_backend = Some(StorageBackend::Local);
    server_config.local_storage_path = Some(storage_dir.path().display().to_string());
    server_config.local_storage_base_url = Some("http://localhost/assets".to_string());
    let config = Config(Box::new(server_config));

    let local = Arc::new(
        LocalStorage::new(
            storage_dir.path(),
            "http://localhost/assets".to_string(),
            config.local_storage_bucket().to_string(),
            config.local_storage_signing_secret().as_bytes(),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let videos = Arc::new(MemoryVideoStore::default());
    let state = AppState::new(
        config.clone(),
        videos.clone(),
        local.clone(),
        Some(local),
        Arc::new(ScriptedRunner::landscape()),
    )
    .expect("Failed to build app state");
    let router = setup_routes(&config, Arc::new(state)).expect("Failed to build routes");

    LocalTestApp {
        server: TestServer::new(router).expect("Failed to create test server"),
        videos,
        _storage_dir: storage_dir,
        _staging_dir: staging_dir,
    }
}
