use crate::error::HttpAppError;
use bytes::Bytes;
use futures::Stream;
use std::sync::Arc;
use tubely_core::models::{ObjectReference, Video};
use tubely_core::AppError;
use tubely_db::VideoStore;
use tubely_processing::{GeometryProber, Remuxer, StagedFile, StagingArea};
use tubely_storage::keys::extension_for_media_type;
use tubely_storage::{derive_object_key, Storage};
use uuid::Uuid;

/// Which reference column a finished upload is persisted to.
#[derive(Debug, Clone, Copy)]
enum Target {
    Video,
    Thumbnail,
}

/// Everything after the ownership check.
///
/// Staging happens on the request task. The rest runs on a spawned task that owns the
/// staged files, so a client disconnect never abandons an external process halfway.
pub struct UploadPipeline {
    staging: StagingArea,
    remuxer: Remuxer,
    prober: GeometryProber,
    storage: Arc<dyn Storage>,
    videos: Arc<dyn VideoStore>,
}

impl UploadPipeline {
    pub fn new(
        staging: StagingArea,
        remuxer: Remuxer,
        prober: GeometryProber,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoStore>,
    ) -> Self {
        Self {
            staging,
            remuxer,
            prober,
            storage,
            videos,
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Receive an upload body into a guarded local file named after its media type.
    pub async fn stage<S, E>(&self, stream: S, media_type: &str) -> Result<StagedFile, HttpAppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let suffix = format!(".{}", extension_for_media_type(media_type)?);
        let staged = self.staging.stage(stream, &suffix).await?;
        Ok(staged)
    }

    /// Remux, probe, upload under `<category>/<random>.<subtype>` and persist the reference.
    pub async fn publish_video(
        self: &Arc<Self>,
        video_id: Uuid,
        raw: StagedFile,
        media_type: &'static str,
    ) -> Result<Video, HttpAppError> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.process_video(video_id, raw, media_type).await })
            .await
            .map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))?
    }

    /// Upload under `<random>.<subtype>` and persist the thumbnail reference.
    pub async fn publish_thumbnail(
        self: &Arc<Self>,
        video_id: Uuid,
        staged: StagedFile,
        media_type: &'static str,
    ) -> Result<Video, HttpAppError> {
        let key = derive_object_key(None, media_type)?;
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline
                .transfer_and_persist(Target::Thumbnail, video_id, &staged, key, media_type)
                .await
        })
        .await
        .map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))?
    }

    #[tracing::instrument(skip(self, raw), fields(video_id = %video_id, size_bytes = raw.size_bytes()))]
    async fn process_video(
        &self,
        video_id: Uuid,
        raw: StagedFile,
        media_type: &'static str,
    ) -> Result<Video, HttpAppError> {
        let remuxed = self.remuxer.remux(&raw).await?;
        // The raw upload is superseded; release it before the transfer.
        drop(raw);

        let category = self.prober.probe(remuxed.path()).await?;
        let key = derive_object_key(Some(category.as_prefix()), media_type)?;

        self.transfer_and_persist(Target::Video, video_id, &remuxed, key, media_type)
            .await
    }

    async fn transfer_and_persist(
        &self,
        target: Target,
        video_id: Uuid,
        staged: &StagedFile,
        key: String,
        media_type: &str,
    ) -> Result<Video, HttpAppError> {
        self.storage
            .upload_file(&key, staged.path(), media_type)
            .await?;

        let reference = ObjectReference::new(self.storage.bucket(), key)?.to_string();
        let video = match target {
            Target::Video => self.videos.set_video_reference(video_id, &reference).await?,
            Target::Thumbnail => {
                self.videos
                    .set_thumbnail_reference(video_id, &reference)
                    .await?
            }
        };

        tracing::info!(
            video_id = %video_id,
            target = ?target,
            reference = %reference,
            "Upload persisted"
        );
        Ok(video)
    }
}
