use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{DateRangeQuery, SlotsQuery};
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::services::availability::{resolve_day, resolve_range};
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;

/// Longest range a single calendar request may cover.
const MAX_RANGE_DAYS: i64 = 366;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.end < query.start {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    if (query.end - query.start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!("Range cannot exceed {} days", MAX_RANGE_DAYS)));
    }

    let config = state.schedule_repo.load_configuration().await?;
    let releases = state.schedule_repo.list_releases(query.start, query.end).await?;
    let counts = state.booking_repo.count_by_range(query.start, query.end).await?;

    let calendar = resolve_range(query.start, query.end, state.config.venue_today(), &config, &releases, &counts);
    debug!("Resolved availability {}..{}: {} blocked", query.start, query.end, calendar.blocked_dates.len());
    Ok(Json(calendar))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let config = state.schedule_repo.load_configuration().await?;
    let releases = state.schedule_repo.list_releases(query.date, query.date).await?;
    let counts = state.booking_repo.count_by_date(query.date).await?;

    let day = resolve_day(query.date, state.config.venue_today(), &config, &releases, &counts);
    Ok(Json(SlotsResponse::from(&day)))
}
