use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateBookingRequest, DateRangeQuery, UpdateBookingStatusRequest};
use crate::api::handlers::draft::load_live_draft;
use crate::domain::models::booking::{is_valid_status, Booking, CapacityLimit, NewBookingParams};
use crate::domain::models::draft::with_cash_snapshot;
use crate::domain::services::availability::{resolve_day, DayStatus};
use crate::domain::services::capacity::{check_guest_capacity, CapacityNotice};
use crate::domain::services::pricing::{audit_draft, calculate_for_catalog};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = match (payload.draft, payload.draft_key.as_deref()) {
        (Some(draft), _) => draft,
        (None, Some(key)) => load_live_draft(&state, key).await?
            .ok_or(AppError::NotFound("Draft not found or expired".into()))?
            .draft,
        (None, None) => return Err(AppError::Validation("Either draft or draft_key is required".into())),
    };

    let (Some(event_date), Some(block_id), Some(package_id), Some(customer_name), Some(customer_email)) = (
        draft.event_date,
        draft.time_block_id.clone(),
        draft.package_id.clone(),
        draft.customer_name.clone(),
        draft.customer_email.clone(),
    ) else {
        let missing: Vec<&str> = [
            ("event_date", draft.event_date.is_none()),
            ("time_block_id", draft.time_block_id.is_none()),
            ("package_id", draft.package_id.is_none()),
            ("customer_name", draft.customer_name.is_none()),
            ("customer_email", draft.customer_email.is_none()),
        ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
        return Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", "))));
    };
    if draft.total_guests() == 0 {
        return Err(AppError::Validation("At least one guest is required".into()));
    }

    info!("create_booking: Checking availability for {} block {}", event_date, block_id);

    let config = state.schedule_repo.load_configuration().await?;
    let releases = state.schedule_repo.list_releases(event_date, event_date).await?;
    let counts = state.booking_repo.count_by_date(event_date).await?;
    let day = resolve_day(event_date, state.config.venue_today(), &config, &releases, &counts);

    match day.status {
        DayStatus::NotOffered => {
            return Err(AppError::Validation(format!("{} is outside the booking window", event_date)));
        }
        DayStatus::Unavailable => {
            warn!("Booking rejected: {} is a closed rest day", event_date);
            return Err(AppError::Conflict("The selected date is unavailable".into()));
        }
        DayStatus::Open => {}
    }

    let slot = day.slot(&block_id)
        .ok_or(AppError::Validation("The selected time block is not offered on that date".into()))?;
    if slot.remaining_capacity == 0 {
        warn!("Booking rejected: block {} on {} is full ({} booked)", block_id, event_date, slot.current_capacity);
        return Err(AppError::Conflict("The selected time slot is fully booked".into()));
    }

    let catalog = state.catalog_repo.load_catalog().await?;
    let package = catalog.packages.iter().find(|p| p.id == package_id)
        .ok_or(AppError::Validation(format!("Unknown package: {}", package_id)))?;

    let notice = check_guest_capacity(draft.adults, draft.kids, package)?;
    if let CapacityNotice::UnderCapacity { guests, max_guests } = notice
        && !payload.confirm_under_capacity {
        return Err(AppError::ConfirmationRequired(format!(
            "{} guests booked for a package sized for {}; confirm to continue", guests, max_guests
        )));
    }

    let payment = state.schedule_repo.get_payment_settings().await?;
    let mut draft = with_cash_snapshot(draft, &payment.cash_discount);
    draft.event_time = Some(slot.start_time);

    let pricing = calculate_for_catalog(&draft, &catalog);
    let warnings = audit_draft(&draft, &catalog);
    if !warnings.is_empty() {
        warn!("Booking draft references missing catalog entries: {:?}", warnings);
    }

    let limit = CapacityLimit {
        max_in_block: slot.max_capacity,
        one_event_per_day: config.settings.one_event_per_day,
    };

    let booking = Booking::new(NewBookingParams {
        event_date,
        time_block_id: block_id,
        start_time: slot.start_time,
        end_time: slot.end_time,
        customer_name,
        customer_email,
        draft,
        pricing,
    });

    let created = match state.booking_repo.create_within_capacity(&booking, limit).await {
        Ok(created) => created,
        Err(AppError::Conflict(msg)) => {
            warn!("Booking rejected at insert: {}", msg);
            return Err(AppError::Conflict(msg));
        }
        Err(e) => return Err(e),
    };

    if let Some(key) = payload.draft_key.as_deref() {
        state.draft_repo.delete(key).await?;
    }

    info!(
        "Booking created: {} ref {} on {} total {}",
        created.id, created.reference, created.event_date, created.pricing.total
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.end < query.start {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    let bookings = state.booking_repo.list_by_range(query.start, query.end).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = payload.status.trim().to_uppercase();
    if !is_valid_status(&status) {
        return Err(AppError::Validation(format!("Unknown booking status: {}", payload.status)));
    }

    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    let config = state.schedule_repo.load_configuration().await?;
    // A block deleted since booking still holds the seat it had.
    let max_in_block = config.time_blocks.iter()
        .find(|b| b.id == booking.time_block_id)
        .map(|b| b.max_events_per_block)
        .unwrap_or(1);
    let limit = CapacityLimit { max_in_block, one_event_per_day: config.settings.one_event_per_day };

    let updated = match state.booking_repo.update_status(&booking_id, &status, limit).await {
        Ok(updated) => updated,
        Err(AppError::Conflict(msg)) => {
            warn!("Booking {} not moved to {}: {}", booking_id, status, msg);
            return Err(AppError::Conflict(msg));
        }
        Err(e) => return Err(e),
    };
    info!("Booking {} is now {}", updated.id, updated.status);
    Ok(Json(updated))
}
