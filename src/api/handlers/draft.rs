use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::DraftResponse;
use crate::domain::models::draft::{apply_update, DraftPatch, ReservationDraft, StoredDraft};
use crate::domain::models::payment::PaymentMethod;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Longest accepted client-generated draft key.
const MAX_KEY_LEN: usize = 128;

fn check_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(AppError::Validation("Invalid draft key".into()));
    }
    Ok(())
}

fn to_response(state: &AppState, stored: StoredDraft) -> DraftResponse {
    DraftResponse {
        expires_at: stored.timestamp + state.config.draft_ttl(),
        key: stored.key,
        draft: stored.draft,
        saved_at: stored.timestamp,
    }
}

/// Loads the stored draft, dropping it once it has outlived the TTL.
pub async fn load_live_draft(state: &AppState, key: &str) -> Result<Option<StoredDraft>, AppError> {
    let Some(stored) = state.draft_repo.find(key).await? else {
        return Ok(None);
    };

    if stored.is_expired(Utc::now(), state.config.draft_ttl()) {
        debug!("Draft {} expired, discarding", key);
        state.draft_repo.delete(key).await?;
        return Ok(None);
    }
    Ok(Some(stored))
}

pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    check_key(&key)?;
    let stored = load_live_draft(&state, &key).await?
        .ok_or(AppError::NotFound("Draft not found or expired".into()))?;
    Ok(Json(to_response(&state, stored)))
}

/// Applies one wizard step to the draft, starting a new one when none is live.
pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(mut patch): Json<DraftPatch>,
) -> Result<impl IntoResponse, AppError> {
    check_key(&key)?;

    let current = load_live_draft(&state, &key).await?
        .map(|stored| stored.draft)
        .unwrap_or_else(ReservationDraft::default);

    let method = patch.payment_method.unwrap_or(current.payment_method);
    if method == PaymentMethod::Cash {
        let payment = state.schedule_repo.get_payment_settings().await?;
        patch.cash_discount = Some(payment.cash_discount);
    }

    let next = apply_update(&current, patch);
    let saved = state.draft_repo.save(&StoredDraft::new(key, next)).await?;
    debug!("Saved draft {}", saved.key);
    Ok(Json(to_response(&state, saved)))
}

pub async fn delete_draft(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    check_key(&key)?;
    state.draft_repo.delete(&key).await?;
    info!("Discarded draft {}", key);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
