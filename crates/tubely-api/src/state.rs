//! Application state shared by every handler.

use crate::services::{UploadPipeline, UrlSigner};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{CommandRunner, GeometryProber, Remuxer, StagingArea};
use tubely_storage::{LocalStorage, Storage};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub pipeline: Arc<UploadPipeline>,
    pub signer: UrlSigner,
    /// Set only for the local backend, whose signed URLs this service serves itself.
    pub local_assets: Option<Arc<LocalStorage>>,
}

impl AppState {
    /// Wire the upload pipeline and signer around the given collaborators.
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        local_assets: Option<Arc<LocalStorage>>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, anyhow::Error> {
        let remuxer = Remuxer::new(config.ffmpeg_path().to_string(), runner.clone())?;
        let prober = GeometryProber::new(config.ffprobe_path().to_string(), runner)?;
        let staging = StagingArea::new(config.staging_dir().cloned());

        tracing::info!(
            staging_dir = %staging.dir().display(),
            bucket = %storage.bucket(),
            backend = %storage.backend_type(),
            "Upload pipeline ready"
        );

        let pipeline = UploadPipeline::new(staging, remuxer, prober, storage.clone(), videos.clone());
        let signer = UrlSigner::new(storage, config.signed_url_ttl());

        Ok(Self {
            config,
            videos,
            pipeline: Arc::new(pipeline),
            signer,
            local_assets,
        })
    }
}
