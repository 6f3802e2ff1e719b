use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::domain::models::catalog::{CatalogKind, EventTheme, ExtraService, FoodOption, PackageOption};
use crate::domain::ports::CatalogRepository;
use crate::error::AppError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Glue that lets one set of handlers serve every catalog collection.
#[async_trait]
pub trait CatalogEntry: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: CatalogKind;

    fn id_mut(&mut self) -> &mut String;
    fn name(&self) -> &str;
    fn validate(&self) -> Result<(), AppError>;

    async fn list(repo: &dyn CatalogRepository) -> Result<Vec<Self>, AppError>;
    async fn save(repo: &dyn CatalogRepository, item: &Self) -> Result<Self, AppError>;
}

fn require_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    Ok(())
}

fn require_non_negative(label: &str, value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::Validation(format!("{} cannot be negative", label)));
    }
    Ok(())
}

#[async_trait]
impl CatalogEntry for PackageOption {
    const KIND: CatalogKind = CatalogKind::Package;

    fn id_mut(&mut self) -> &mut String { &mut self.id }
    fn name(&self) -> &str { &self.name }

    fn validate(&self) -> Result<(), AppError> {
        require_name(&self.name)?;
        if self.max_guests < 1 {
            return Err(AppError::Validation("max_guests must be at least 1".into()));
        }
        match (&self.pricing, self.base_price) {
            (Some(pricing), _) => {
                require_non_negative("Weekday price", pricing.weekday)?;
                require_non_negative("Weekend price", pricing.weekend)
            }
            (None, Some(base)) => require_non_negative("Base price", base),
            (None, None) => Err(AppError::Validation("Either pricing or base_price is required".into())),
        }
    }

    async fn list(repo: &dyn CatalogRepository) -> Result<Vec<Self>, AppError> { repo.list_packages().await }
    async fn save(repo: &dyn CatalogRepository, item: &Self) -> Result<Self, AppError> { repo.save_package(item).await }
}

#[async_trait]
impl CatalogEntry for FoodOption {
    const KIND: CatalogKind = CatalogKind::Food;

    fn id_mut(&mut self) -> &mut String { &mut self.id }
    fn name(&self) -> &str { &self.name }

    fn validate(&self) -> Result<(), AppError> {
        require_name(&self.name)?;
        require_non_negative("Base price", self.base_price)?;
        require_non_negative("Adult price", self.adult_unit_price())?;
        require_non_negative("Kids price", self.kids_unit_price())?;
        for upgrade in self.upgrades.adult.iter().chain(self.upgrades.kids.iter()) {
            require_non_negative("Upgrade price", upgrade.additional_price)?;
        }
        Ok(())
    }

    async fn list(repo: &dyn CatalogRepository) -> Result<Vec<Self>, AppError> { repo.list_food_options().await }
    async fn save(repo: &dyn CatalogRepository, item: &Self) -> Result<Self, AppError> { repo.save_food_option(item).await }
}

#[async_trait]
impl CatalogEntry for EventTheme {
    const KIND: CatalogKind = CatalogKind::Theme;

    fn id_mut(&mut self) -> &mut String { &mut self.id }
    fn name(&self) -> &str { &self.name }

    fn validate(&self) -> Result<(), AppError> {
        require_name(&self.name)?;
        for package in &self.packages {
            if package.id.trim().is_empty() {
                return Err(AppError::Validation("Theme packages need an id".into()));
            }
            require_non_negative("Theme package price", package.price)?;
        }
        Ok(())
    }

    async fn list(repo: &dyn CatalogRepository) -> Result<Vec<Self>, AppError> { repo.list_themes().await }
    async fn save(repo: &dyn CatalogRepository, item: &Self) -> Result<Self, AppError> { repo.save_theme(item).await }
}

#[async_trait]
impl CatalogEntry for ExtraService {
    const KIND: CatalogKind = CatalogKind::Extra;

    fn id_mut(&mut self) -> &mut String { &mut self.id }
    fn name(&self) -> &str { &self.name }

    fn validate(&self) -> Result<(), AppError> {
        require_name(&self.name)?;
        require_non_negative("Price", self.price)
    }

    async fn list(repo: &dyn CatalogRepository) -> Result<Vec<Self>, AppError> { repo.list_extras().await }
    async fn save(repo: &dyn CatalogRepository, item: &Self) -> Result<Self, AppError> { repo.save_extra(item).await }
}

pub async fn list_items<T: CatalogEntry>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<T>>, AppError> {
    let items = T::list(state.catalog_repo.as_ref()).await?;
    Ok(Json(items))
}

pub async fn create_item<T: CatalogEntry>(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(mut payload): Json<T>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = payload.id_mut();
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    } else if state.catalog_repo.exists(T::KIND, id).await? {
        return Err(AppError::Conflict(format!("{} '{}' already exists", T::KIND.as_str(), id)));
    }

    let created = T::save(state.catalog_repo.as_ref(), &payload).await?;
    info!("Created {} entry: {}", T::KIND.as_str(), created.name());
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_item<T: CatalogEntry>(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(item_id): Path<String>,
    Json(mut payload): Json<T>,
) -> Result<impl IntoResponse, AppError> {
    if !state.catalog_repo.exists(T::KIND, &item_id).await? {
        return Err(AppError::NotFound(format!("{} '{}' not found", T::KIND.as_str(), item_id)));
    }
    payload.validate()?;
    *payload.id_mut() = item_id;

    let updated = T::save(state.catalog_repo.as_ref(), &payload).await?;
    info!("Updated {} entry: {}", T::KIND.as_str(), updated.name());
    Ok(Json(updated))
}

pub async fn delete_item<T: CatalogEntry>(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.catalog_repo.delete(T::KIND, &item_id).await?;
    info!("Deleted {} entry: {}", T::KIND.as_str(), item_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
