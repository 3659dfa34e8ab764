use chrono::Utc;
use sqlx::{PgPool, Postgres};
use tubely_core::models::{CreateVideoRequest, Video};
use tubely_core::AppError;
use uuid::Uuid;

/// Video record persistence.
///
/// Reference columns hold `<bucket>,<key>` strings; setters replace the previous value
/// and bump `updated_at`.
#[async_trait::async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, user_id: Uuid, request: CreateVideoRequest)
        -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Fails with `NotFound` when the record no longer exists.
    async fn set_video_reference(&self, id: Uuid, reference: &str) -> Result<Video, AppError>;

    /// Fails with `NotFound` when the record no longer exists.
    async fn set_thumbnail_reference(&self, id: Uuid, reference: &str)
        -> Result<Video, AppError>;

    /// Returns `false` when nothing was deleted.
    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// PostgreSQL-backed [`VideoStore`].
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_reference_column(
        &self,
        column: ReferenceColumn,
        id: Uuid,
        reference: &str,
    ) -> Result<Video, AppError> {
        let sql = match column {
            ReferenceColumn::Video => {
                "UPDATE videos SET video_url = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ReferenceColumn::Thumbnail => {
                "UPDATE videos SET thumbnail_url = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
        };

        sqlx::query_as::<Postgres, Video>(sql)
            .bind(id)
            .bind(reference)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}

#[derive(Debug, Clone, Copy)]
enum ReferenceColumn {
    Video,
    Thumbnail,
}

#[async_trait::async_trait]
impl VideoStore for VideoRepository {
    #[tracing::instrument(skip(self, request), fields(db.table = "videos", db.operation = "insert"))]
    async fn create_video(
        &self,
        user_id: Uuid,
        request: CreateVideoRequest,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id)
            VALUES ($1, $2, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(&request.title)
        .bind(&request.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(video_id = %video.id, "Video record created");
        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Postgres, Video>(
            "SELECT * FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_reference(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.set_reference_column(ReferenceColumn::Video, id, reference)
            .await
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_thumbnail_reference(
        &self,
        id: Uuid,
        reference: &str,
    ) -> Result<Video, AppError> {
        self.set_reference_column(ReferenceColumn::Thumbnail, id, reference)
            .await
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
