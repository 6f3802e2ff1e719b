use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateReleaseRequest, ReleaseListQuery, TimeCalculatorQuery, UpsertRestDayRequest};
use crate::api::dtos::responses::TimeCalculatorResponse;
use crate::domain::models::schedule::{hhmm, new_block_id, RestDay, RestDayRelease, ScheduleSettings, TimeBlock};
use crate::domain::services::availability::{day_of_week, shift_days};
use crate::domain::services::schedule_time::{calculate_end_time, calculate_start_time, format_duration, required_minutes};
use crate::domain::services::schedule_validator::{validate_rest_days, validate_settings, validate_time_block, ScheduleError};
use crate::error::AppError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let config = state.schedule_repo.load_configuration().await?;
    Ok(Json(config))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<ScheduleSettings>,
) -> Result<impl IntoResponse, AppError> {
    validate_settings(&payload)?;
    let saved = state.schedule_repo.save_settings(&payload).await?;
    info!(
        "Updated schedule settings: advance window {}..{} days, one_event_per_day={}",
        saved.min_advance_booking_days, saved.max_advance_booking_days, saved.one_event_per_day
    );
    Ok(Json(saved))
}

pub async fn create_time_block(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(mut payload): Json<TimeBlock>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = state.time_block_writes.lock().await;
    let existing = state.schedule_repo.list_time_blocks().await?;
    let summary = validate_time_block(&payload, &existing, None)?;

    if payload.id.trim().is_empty() {
        payload.id = new_block_id();
    }
    let created = state.schedule_repo.create_time_block(&payload).await?;
    info!("Created time block '{}' ({} margin {})", created.name, created.id, summary.margin);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Dry run used by the admin form. A block carrying the id of a stored block is
/// checked as an edit of that block.
pub async fn dry_run_time_block(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<TimeBlock>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.schedule_repo.list_time_blocks().await?;
    let editing_index = existing.iter().position(|b| !payload.id.is_empty() && b.id == payload.id);
    let summary = validate_time_block(&payload, &existing, editing_index)?;
    Ok(Json(summary))
}

pub async fn update_time_block(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(block_id): Path<String>,
    Json(mut payload): Json<TimeBlock>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = state.time_block_writes.lock().await;
    let existing = state.schedule_repo.list_time_blocks().await?;
    let editing_index = existing.iter().position(|b| b.id == block_id)
        .ok_or(AppError::NotFound("Time block not found".into()))?;

    payload.id = block_id;
    validate_time_block(&payload, &existing, Some(editing_index))?;

    let updated = state.schedule_repo.update_time_block(&payload).await?;
    info!("Updated time block '{}' ({})", updated.name, updated.id);
    Ok(Json(updated))
}

pub async fn delete_time_block(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(block_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_time_block(&block_id).await?;
    info!("Deleted time block: {}", block_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn time_calculator(
    Query(query): Query<TimeCalculatorQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !(query.duration.is_finite() && query.duration > 0.0) {
        return Err(ScheduleError::InvalidDuration.into());
    }
    let required = required_minutes(query.duration, query.half_hour_break);

    let (start_time, end_time) = match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), _) => {
            let start = hhmm::parse(start).map_err(AppError::Validation)?;
            (start, calculate_end_time(start, query.duration, query.half_hour_break))
        }
        (None, Some(end)) => {
            let end = hhmm::parse(end).map_err(AppError::Validation)?;
            (calculate_start_time(end, query.duration, query.half_hour_break), end)
        }
        (None, None) => return Err(AppError::Validation("Either start or end is required".into())),
    };

    Ok(Json(TimeCalculatorResponse {
        start_time,
        end_time,
        required_minutes: required,
        required: format_duration(required as i64),
    }))
}

pub async fn upsert_rest_day(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(day): Path<u8>,
    Json(payload): Json<UpsertRestDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fee = payload.fee.unwrap_or(Decimal::ZERO);
    if fee < Decimal::ZERO {
        return Err(AppError::Validation("Rest day fee cannot be negative".into()));
    }

    let rest_day = RestDay {
        day,
        name: payload.name,
        fee,
        can_be_released: payload.can_be_released.unwrap_or(false),
    };

    let mut rest_days: Vec<RestDay> = state.schedule_repo.list_rest_days().await?
        .into_iter()
        .filter(|r| r.day != day)
        .collect();
    rest_days.push(rest_day.clone());
    validate_rest_days(&rest_days)?;

    let saved = state.schedule_repo.upsert_rest_day(&rest_day).await?;
    info!("Saved rest day {} ({}), releasable={}", saved.day, saved.name, saved.can_be_released);
    Ok(Json(saved))
}

pub async fn delete_rest_day(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(day): Path<u8>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_rest_day(day).await?;
    info!("Deleted rest day: {}", day);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_releases(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<ReleaseListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.config.venue_today();
    let start = query.start.unwrap_or(today);
    let end = match query.end {
        Some(end) => end,
        None => {
            let settings = state.schedule_repo.get_settings().await?;
            shift_days(today, settings.max_advance_booking_days).unwrap_or(NaiveDate::MAX)
        }
    };
    let releases = state.schedule_repo.list_releases(start, end).await?;
    Ok(Json(releases))
}

pub async fn create_release(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateReleaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let weekday = day_of_week(payload.date);
    let rest_day = state.schedule_repo.list_rest_days().await?
        .into_iter()
        .find(|r| r.day == weekday)
        .ok_or(AppError::Validation(format!("{} is not a rest day", payload.date)))?;

    if !rest_day.can_be_released {
        return Err(AppError::Validation(format!("Rest day '{}' cannot be released", rest_day.name)));
    }

    let release = RestDayRelease::new(payload.date, payload.fee.unwrap_or(rest_day.fee), payload.note);
    let saved = state.schedule_repo.upsert_release(&release).await?;
    info!("Released rest day '{}' for {} (fee {})", rest_day.name, saved.date, saved.fee);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_release(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_release(date).await?;
    info!("Removed rest day release for {}", date);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
