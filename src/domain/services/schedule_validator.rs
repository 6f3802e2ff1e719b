use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::domain::models::schedule::{RestDay, ScheduleSettings, TimeBlock};
use crate::domain::services::schedule_time::{format_duration, required_minutes, to_minutes};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Start time must be before end time")]
    InvalidRange,
    #[error("Window too short: {available} available, {required} required")]
    InsufficientWindow { available: String, required: String },
    #[error("Overlaps with time block '{conflicting_block}'")]
    ScheduleOverlap { conflicting_block: String },
    #[error("A time block must apply to at least one day")]
    EmptyDays,
    #[error("Invalid day of week {0}, expected 0 (Sunday) to 6 (Saturday)")]
    InvalidDay(u8),
    #[error("Event duration must be greater than zero")]
    InvalidDuration,
    #[error("Max events per block must be at least 1")]
    InvalidCapacity,
    #[error("Rest day {0} is configured more than once")]
    DuplicateRestDay(u8),
    #[error("Advance booking days must satisfy 0 <= minimum <= maximum <= {}", MAX_ADVANCE_BOOKING_DAYS)]
    InvalidAdvanceWindow,
}

impl ScheduleError {
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InvalidRange => "INVALID_RANGE",
            ScheduleError::InsufficientWindow { .. } => "INSUFFICIENT_WINDOW",
            ScheduleError::ScheduleOverlap { .. } => "SCHEDULE_OVERLAP",
            ScheduleError::EmptyDays => "EMPTY_DAYS",
            ScheduleError::InvalidDay(_) => "INVALID_DAY",
            ScheduleError::InvalidDuration => "INVALID_DURATION",
            ScheduleError::InvalidCapacity => "INVALID_CAPACITY",
            ScheduleError::DuplicateRestDay(_) => "DUPLICATE_REST_DAY",
            ScheduleError::InvalidAdvanceWindow => "INVALID_ADVANCE_WINDOW",
        }
    }
}

/// Informational figures shown next to a valid block. The margin is never enforced.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WindowSummary {
    pub total_minutes: i64,
    pub required_minutes: i64,
    pub margin_minutes: i64,
    pub total: String,
    pub required: String,
    pub margin: String,
}

/// Checks `candidate` on its own and against `existing`. `editing_index` is the
/// position of the block being edited, which is skipped in the overlap check.
pub fn validate_time_block(
    candidate: &TimeBlock,
    existing: &[TimeBlock],
    editing_index: Option<usize>,
) -> Result<WindowSummary, ScheduleError> {
    if candidate.days.is_empty() {
        return Err(ScheduleError::EmptyDays);
    }
    if let Some(&day) = candidate.days.iter().find(|d| **d > 6) {
        return Err(ScheduleError::InvalidDay(day));
    }
    if !(candidate.duration.is_finite() && candidate.duration > 0.0) {
        return Err(ScheduleError::InvalidDuration);
    }
    if candidate.max_events_per_block < 1 {
        return Err(ScheduleError::InvalidCapacity);
    }

    let start = to_minutes(candidate.start_time) as i64;
    let end = to_minutes(candidate.end_time) as i64;
    let required = required_minutes(candidate.duration, candidate.half_hour_break) as i64;

    if start >= end {
        return Err(ScheduleError::InvalidRange);
    }

    let available = end - start;
    if available < required {
        return Err(ScheduleError::InsufficientWindow {
            available: format_duration(available),
            required: format_duration(required),
        });
    }

    for (index, other) in existing.iter().enumerate() {
        if Some(index) == editing_index || !candidate.shares_day_with(other) {
            continue;
        }
        let other_start = to_minutes(other.start_time) as i64;
        let other_end = to_minutes(other.end_time) as i64;
        if start < other_end && end > other_start {
            return Err(ScheduleError::ScheduleOverlap {
                conflicting_block: other.name.clone(),
            });
        }
    }

    Ok(WindowSummary {
        total_minutes: available,
        required_minutes: required,
        margin_minutes: available - required,
        total: format_duration(available),
        required: format_duration(required),
        margin: format_duration(available - required),
    })
}

pub fn validate_rest_days(rest_days: &[RestDay]) -> Result<(), ScheduleError> {
    let mut seen = HashSet::new();
    for rest in rest_days {
        if rest.day > 6 {
            return Err(ScheduleError::InvalidDay(rest.day));
        }
        if !seen.insert(rest.day) {
            return Err(ScheduleError::DuplicateRestDay(rest.day));
        }
    }
    Ok(())
}

/// Ten years; the booking calendar is never opened further out.
pub const MAX_ADVANCE_BOOKING_DAYS: i64 = 3650;

pub fn validate_settings(settings: &ScheduleSettings) -> Result<(), ScheduleError> {
    if settings.min_advance_booking_days < 0
        || settings.min_advance_booking_days > settings.max_advance_booking_days
        || settings.max_advance_booking_days > MAX_ADVANCE_BOOKING_DAYS
    {
        return Err(ScheduleError::InvalidAdvanceWindow);
    }
    if settings.max_concurrent_events < 1 {
        return Err(ScheduleError::InvalidCapacity);
    }
    Ok(())
}
