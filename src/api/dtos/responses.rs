use crate::domain::models::draft::ReservationDraft;
use crate::domain::models::payment::PricingBreakdown;
use crate::domain::models::schedule::hhmm;
use crate::domain::services::availability::{DayAvailability, DayStatus, TimeSlot};
use crate::domain::services::capacity::CapacityNotice;
use crate::domain::services::pricing::DataQualityWarning;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotView {
    pub time_block_id: String,
    pub name: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration: f64,
    pub total_capacity: u32,
    pub current_capacity: u32,
    pub remaining_capacity: u32,
}

impl From<&TimeSlot> for SlotView {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            time_block_id: slot.time_block_id.clone(),
            name: slot.name.clone(),
            time: slot.start_time,
            end_time: slot.end_time,
            duration: slot.duration,
            total_capacity: slot.max_capacity,
            current_capacity: slot.current_capacity,
            remaining_capacity: slot.remaining_capacity,
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub slots: Vec<SlotView>,
    /// Duration of the earliest slot, 0 when the day has none.
    pub default_event_duration: f64,
    pub is_unavailable: bool,
    pub has_bookings: bool,
    pub release_fee: Option<Decimal>,
}

impl From<&DayAvailability> for SlotsResponse {
    fn from(day: &DayAvailability) -> Self {
        Self {
            date: day.date,
            status: day.status,
            slots: day.slots.iter().map(SlotView::from).collect(),
            default_event_duration: day.slots.first().map(|s| s.duration).unwrap_or(0.0),
            is_unavailable: day.is_unavailable,
            has_bookings: day.has_bookings,
            release_fee: day.release_fee,
        }
    }
}

#[derive(Serialize)]
pub struct TimeCalculatorResponse {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub required_minutes: u32,
    pub required: String,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub pricing: PricingBreakdown,
    pub rate_label: &'static str,
    pub warnings: Vec<DataQualityWarning>,
    pub capacity_notice: Option<CapacityNotice>,
    /// Set when the guests exceed the package; the booking would be refused.
    pub capacity_error: Option<String>,
}

#[derive(Serialize)]
pub struct DraftResponse {
    pub key: String,
    pub draft: ReservationDraft,
    pub saved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
