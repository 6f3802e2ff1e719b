use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::models::booking::BlockBookingCounts;
use crate::domain::models::schedule::{hhmm, RestDayRelease, ScheduleConfiguration};
use crate::domain::services::schedule_time::calculate_end_time;

/// 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Open,
    /// Outside the advance booking window; callers should not offer the date at all.
    NotOffered,
    /// Closed rest day.
    Unavailable,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TimeSlot {
    pub time_block_id: String,
    pub name: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration: f64,
    pub max_capacity: u32,
    pub current_capacity: u32,
    pub remaining_capacity: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub day_of_week: u8,
    pub status: DayStatus,
    pub is_unavailable: bool,
    pub has_bookings: bool,
    pub rest_day_name: Option<String>,
    /// Fee charged when an otherwise closed rest day has been released.
    pub release_fee: Option<Decimal>,
    pub slots: Vec<TimeSlot>,
}

impl DayAvailability {
    pub fn is_bookable(&self) -> bool {
        self.status == DayStatus::Open && self.slots.iter().any(|s| s.remaining_capacity > 0)
    }

    pub fn slot(&self, time_block_id: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.time_block_id == time_block_id)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AvailabilityCalendar {
    pub available_slots: BTreeMap<NaiveDate, DayAvailability>,
    pub blocked_dates: Vec<NaiveDate>,
}

/// `None` when the offset leaves the calendar.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|offset| date.checked_add_signed(offset))
}

pub fn is_within_advance_window(date: NaiveDate, today: NaiveDate, config: &ScheduleConfiguration) -> bool {
    let Some(earliest) = shift_days(today, config.settings.min_advance_booking_days) else {
        return false;
    };
    let latest = shift_days(today, config.settings.max_advance_booking_days).unwrap_or(NaiveDate::MAX);
    date >= earliest && date <= latest
}

/// Bookable slots for `date`. `booking_counts` must come from a single read of
/// the booking store for that date.
pub fn resolve_day(
    date: NaiveDate,
    today: NaiveDate,
    config: &ScheduleConfiguration,
    releases: &[RestDayRelease],
    booking_counts: &BlockBookingCounts,
) -> DayAvailability {
    let weekday = day_of_week(date);
    let has_bookings = booking_counts.values().any(|c| *c > 0);

    let mut day = DayAvailability {
        date,
        day_of_week: weekday,
        status: DayStatus::Open,
        is_unavailable: false,
        has_bookings,
        rest_day_name: None,
        release_fee: None,
        slots: Vec::new(),
    };

    if !is_within_advance_window(date, today, config) {
        day.status = DayStatus::NotOffered;
        return day;
    }

    if let Some(rest) = config.rest_day_for(weekday) {
        day.rest_day_name = Some(rest.name.clone());
        match releases.iter().find(|r| r.date == date) {
            Some(release) if rest.can_be_released => {
                day.release_fee = Some(release.fee);
            }
            _ => {
                day.status = DayStatus::Unavailable;
                day.is_unavailable = true;
                return day;
            }
        }
    }

    let one_event_per_day = config.settings.one_event_per_day;
    let day_locked = one_event_per_day && has_bookings;

    let mut slots: Vec<TimeSlot> = config.time_blocks.iter()
        .filter(|block| block.covers_day(weekday))
        .map(|block| {
            let max_capacity = if one_event_per_day { 1 } else { block.max_events_per_block };
            let current = booking_counts.get(&block.id).copied().unwrap_or(0);
            let remaining = if day_locked { 0 } else { max_capacity.saturating_sub(current) };

            TimeSlot {
                time_block_id: block.id.clone(),
                name: block.name.clone(),
                start_time: block.start_time,
                end_time: calculate_end_time(block.start_time, block.duration, block.half_hour_break),
                duration: block.duration,
                max_capacity,
                current_capacity: current,
                remaining_capacity: remaining,
            }
        })
        .collect();

    slots.sort_by_key(|s| s.start_time);
    day.slots = slots;
    day
}

pub fn resolve_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    config: &ScheduleConfiguration,
    releases: &[RestDayRelease],
    counts_by_date: &BTreeMap<NaiveDate, BlockBookingCounts>,
) -> AvailabilityCalendar {
    let empty = BlockBookingCounts::new();
    let mut available_slots = BTreeMap::new();
    let mut blocked_dates = Vec::new();

    let mut current = start;
    while current <= end {
        let counts = counts_by_date.get(&current).unwrap_or(&empty);
        let day = resolve_day(current, today, config, releases, counts);
        if !day.is_bookable() {
            blocked_dates.push(current);
        }
        available_slots.insert(current, day);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    AvailabilityCalendar { available_slots, blocked_dates }
}
