use crate::domain::{
    models::{
        payment::PaymentSettings,
        schedule::{RestDay, RestDayRelease, ScheduleSettings, TimeBlock},
    },
    ports::ScheduleRepository,
};
use crate::domain::services::schedule_time::to_minutes;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{types::Json, PgPool};

pub struct PostgresScheduleRepo {
    pool: PgPool,
}

impl PostgresScheduleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepo {
    async fn get_settings(&self) -> Result<ScheduleSettings, AppError> {
        let row = sqlx::query_scalar::<_, Json<ScheduleSettings>>("SELECT schedule FROM venue_settings WHERE id = 1").fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.map(|json| json.0).unwrap_or_default())
    }
    async fn save_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings, AppError> {
        sqlx::query("INSERT INTO venue_settings (id, schedule, payment, updated_at) VALUES (1, $1, $2, $3) ON CONFLICT (id) DO UPDATE SET schedule = EXCLUDED.schedule, updated_at = EXCLUDED.updated_at").bind(Json(settings)).bind(Json(PaymentSettings::default())).bind(Utc::now()).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(settings.clone())
    }
    async fn get_payment_settings(&self) -> Result<PaymentSettings, AppError> {
        let row = sqlx::query_scalar::<_, Json<PaymentSettings>>("SELECT payment FROM venue_settings WHERE id = 1").fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.map(|json| json.0).unwrap_or_default())
    }
    async fn save_payment_settings(&self, settings: &PaymentSettings) -> Result<PaymentSettings, AppError> {
        sqlx::query("INSERT INTO venue_settings (id, schedule, payment, updated_at) VALUES (1, $1, $2, $3) ON CONFLICT (id) DO UPDATE SET payment = EXCLUDED.payment, updated_at = EXCLUDED.updated_at").bind(Json(ScheduleSettings::default())).bind(Json(settings)).bind(Utc::now()).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(settings.clone())
    }
    async fn list_time_blocks(&self) -> Result<Vec<TimeBlock>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<TimeBlock>>("SELECT data FROM time_blocks ORDER BY start_minute ASC, created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|json| json.0).collect())
    }
    async fn create_time_block(&self, block: &TimeBlock) -> Result<TimeBlock, AppError> {
        sqlx::query("INSERT INTO time_blocks (id, start_minute, data, created_at) VALUES ($1, $2, $3, $4)").bind(&block.id).bind(to_minutes(block.start_time) as i32).bind(Json(block)).bind(Utc::now()).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(block.clone())
    }
    async fn update_time_block(&self, block: &TimeBlock) -> Result<TimeBlock, AppError> {
        let result = sqlx::query("UPDATE time_blocks SET start_minute = $1, data = $2 WHERE id = $3").bind(to_minutes(block.start_time) as i32).bind(Json(block)).bind(&block.id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Time block not found".into())); }
        Ok(block.clone())
    }
    async fn delete_time_block(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM time_blocks WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Time block not found".into())); }
        Ok(())
    }
    async fn list_rest_days(&self) -> Result<Vec<RestDay>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<RestDay>>("SELECT data FROM rest_days ORDER BY day ASC").fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|json| json.0).collect())
    }
    async fn upsert_rest_day(&self, rest_day: &RestDay) -> Result<RestDay, AppError> {
        sqlx::query("INSERT INTO rest_days (day, data) VALUES ($1, $2) ON CONFLICT (day) DO UPDATE SET data = EXCLUDED.data").bind(i32::from(rest_day.day)).bind(Json(rest_day)).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(rest_day.clone())
    }
    async fn delete_rest_day(&self, day: u8) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rest_days WHERE day = $1").bind(i32::from(day)).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Rest day not found".into())); }
        Ok(())
    }
    async fn list_releases(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RestDayRelease>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<RestDayRelease>>("SELECT data FROM rest_day_releases WHERE release_date >= $1 AND release_date <= $2 ORDER BY release_date ASC").bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|json| json.0).collect())
    }
    async fn upsert_release(&self, release: &RestDayRelease) -> Result<RestDayRelease, AppError> {
        sqlx::query("INSERT INTO rest_day_releases (release_date, data) VALUES ($1, $2) ON CONFLICT (release_date) DO UPDATE SET data = EXCLUDED.data").bind(release.date).bind(Json(release)).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(release.clone())
    }
    async fn delete_release(&self, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rest_day_releases WHERE release_date = $1").bind(date).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Release not found".into())); }
        Ok(())
    }
}
