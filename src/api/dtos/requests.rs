use crate::domain::models::draft::ReservationDraft;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TimeCalculatorQuery {
    /// "HH:MM". Exactly one of `start` / `end` is expected.
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: f64,
    #[serde(default)]
    pub half_hour_break: bool,
}

#[derive(Deserialize)]
pub struct UpsertRestDayRequest {
    pub name: String,
    pub fee: Option<Decimal>,
    pub can_be_released: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateReleaseRequest {
    pub date: NaiveDate,
    /// Defaults to the rest day's configured fee.
    pub fee: Option<Decimal>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    /// Stored draft to submit; also discarded once the booking exists.
    pub draft_key: Option<String>,
    /// Inline draft, takes precedence over the stored one.
    pub draft: Option<ReservationDraft>,
    #[serde(default)]
    pub confirm_under_capacity: bool,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ReleaseListQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}
