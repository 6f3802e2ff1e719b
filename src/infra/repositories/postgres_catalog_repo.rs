use crate::domain::{
    models::catalog::{CatalogKind, EventTheme, ExtraService, FoodOption, PackageOption},
    ports::CatalogRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{types::Json, PgPool};

pub struct PostgresCatalogRepo {
    pool: PgPool,
}

impl PostgresCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_kind<T: DeserializeOwned + Send + Unpin + 'static>(&self, kind: CatalogKind) -> Result<Vec<T>, AppError> {
        let rows = sqlx::query_scalar::<_, Json<T>>("SELECT data FROM catalog_items WHERE kind = $1 ORDER BY created_at ASC, name ASC").bind(kind.as_str()).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|json| json.0).collect())
    }

    async fn upsert<T: Serialize + Sync>(&self, kind: CatalogKind, id: &str, name: &str, item: &T) -> Result<(), AppError> {
        sqlx::query("INSERT INTO catalog_items (kind, id, name, data, created_at) VALUES ($1, $2, $3, $4, $5) ON CONFLICT (kind, id) DO UPDATE SET name = EXCLUDED.name, data = EXCLUDED.data").bind(kind.as_str()).bind(id).bind(name).bind(Json(item)).bind(Utc::now()).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepo {
    async fn list_packages(&self) -> Result<Vec<PackageOption>, AppError> { self.list_kind(CatalogKind::Package).await }
    async fn save_package(&self, package: &PackageOption) -> Result<PackageOption, AppError> {
        self.upsert(CatalogKind::Package, &package.id, &package.name, package).await?;
        Ok(package.clone())
    }
    async fn list_food_options(&self) -> Result<Vec<FoodOption>, AppError> { self.list_kind(CatalogKind::Food).await }
    async fn save_food_option(&self, food: &FoodOption) -> Result<FoodOption, AppError> {
        self.upsert(CatalogKind::Food, &food.id, &food.name, food).await?;
        Ok(food.clone())
    }
    async fn list_themes(&self) -> Result<Vec<EventTheme>, AppError> { self.list_kind(CatalogKind::Theme).await }
    async fn save_theme(&self, theme: &EventTheme) -> Result<EventTheme, AppError> {
        self.upsert(CatalogKind::Theme, &theme.id, &theme.name, theme).await?;
        Ok(theme.clone())
    }
    async fn list_extras(&self) -> Result<Vec<ExtraService>, AppError> { self.list_kind(CatalogKind::Extra).await }
    async fn save_extra(&self, extra: &ExtraService) -> Result<ExtraService, AppError> {
        self.upsert(CatalogKind::Extra, &extra.id, &extra.name, extra).await?;
        Ok(extra.clone())
    }
    async fn exists(&self, kind: CatalogKind, id: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items WHERE kind = $1 AND id = $2").bind(kind.as_str()).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(count > 0)
    }
    async fn delete(&self, kind: CatalogKind, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE kind = $1 AND id = $2").bind(kind.as_str()).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Catalog item not found".into())); }
        Ok(())
    }
}
