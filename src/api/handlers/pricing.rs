use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::QuoteResponse;
use crate::domain::models::draft::{with_cash_snapshot, ReservationDraft};
use crate::domain::services::capacity::check_guest_capacity;
use crate::domain::services::pricing::{audit_draft, calculate_for_catalog};
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReservationDraft>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = state.catalog_repo.load_catalog().await?;
    let payment = state.schedule_repo.get_payment_settings().await?;
    let draft = with_cash_snapshot(payload, &payment.cash_discount);

    let pricing = calculate_for_catalog(&draft, &catalog);
    let warnings = audit_draft(&draft, &catalog);

    let (capacity_notice, capacity_error) = match draft.package_id.as_deref()
        .and_then(|id| catalog.packages.iter().find(|p| p.id == id))
    {
        Some(package) => match check_guest_capacity(draft.adults, draft.kids, package) {
            Ok(notice) => (Some(notice), None),
            Err(e) => (None, Some(e.to_string())),
        },
        None => (None, None),
    };

    debug!("Quoted draft: subtotal {} total {} ({} warnings)", pricing.subtotal, pricing.total, warnings.len());

    Ok(Json(QuoteResponse {
        rate_label: pricing.rate_tier.label(),
        pricing,
        warnings,
        capacity_notice,
        capacity_error,
    }))
}
