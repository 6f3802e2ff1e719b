use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::domain::models::payment::PaymentSettings;
use crate::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

fn is_percentage(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED
}

pub async fn get_payment_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.schedule_repo.get_payment_settings().await?;
    Ok(Json(settings))
}

pub async fn update_payment_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<PaymentSettings>,
) -> Result<impl IntoResponse, AppError> {
    if !is_percentage(payload.cash_discount.percentage) {
        return Err(AppError::Validation("Cash discount percentage must be between 0 and 100".into()));
    }
    if !is_percentage(payload.deposit_percentage) {
        return Err(AppError::Validation("Deposit percentage must be between 0 and 100".into()));
    }

    let saved = state.schedule_repo.save_payment_settings(&payload).await?;
    info!(
        "Updated payment settings: cash discount {} ({}%)",
        if saved.cash_discount.enabled { "enabled" } else { "disabled" },
        saved.cash_discount.percentage
    );
    Ok(Json(saved))
}
