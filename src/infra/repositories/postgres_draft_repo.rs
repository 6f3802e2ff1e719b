use crate::domain::{models::draft::StoredDraft, ports::DraftRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};

pub struct PostgresDraftRepo {
    pool: PgPool,
}

impl PostgresDraftRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftRepository for PostgresDraftRepo {
    async fn save(&self, draft: &StoredDraft) -> Result<StoredDraft, AppError> {
        sqlx::query_as::<_, StoredDraft>("INSERT INTO drafts (draft_key, draft, saved_at) VALUES ($1, $2, $3) ON CONFLICT (draft_key) DO UPDATE SET draft = EXCLUDED.draft, saved_at = EXCLUDED.saved_at RETURNING *").bind(&draft.key).bind(Json(&draft.draft)).bind(draft.timestamp).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find(&self, key: &str) -> Result<Option<StoredDraft>, AppError> {
        sqlx::query_as::<_, StoredDraft>("SELECT * FROM drafts WHERE draft_key = $1").bind(key).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM drafts WHERE draft_key = $1").bind(key).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM drafts WHERE saved_at < $1").bind(cutoff).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
