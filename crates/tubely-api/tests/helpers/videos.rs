use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tubely_core::models::{CreateVideoRequest, Video};
use tubely_core::AppError;
use tubely_db::VideoStore;
use uuid::Uuid;

/// In-memory [`VideoStore`].
#[derive(Default)]
pub struct MemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl MemoryVideoStore {
    pub fn insert(&self, video: Video) -> Video {
        self.videos
            .lock()
            .unwrap()
            .insert(video.id, video.clone());
        video
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    fn update(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Video),
    ) -> Result<Video, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        apply(video);
        video.updated_at = Utc::now();
        Ok(video.clone())
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn create_video(
        &self,
        user_id: Uuid,
        request: CreateVideoRequest,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        Ok(self.insert(Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: request.title,
            description: request.description,
            user_id,
            thumbnail_url: None,
            video_url: None,
        }))
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn set_video_reference(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.update(id, |video| video.video_url = Some(reference.to_string()))
    }

    async fn set_thumbnail_reference(
        &self,
        id: Uuid,
        reference: &str,
    ) -> Result<Video, AppError> {
        self.update(id, |video| video.thumbnail_url = Some(reference.to_string()))
    }

    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.videos.lock().unwrap().remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
