use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::draft::ReservationDraft;
use crate::domain::models::payment::PricingBreakdown;
use crate::domain::models::schedule::hhmm;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// Bookings per time block id on a single date. Only pending and confirmed
/// bookings are counted.
pub type BlockBookingCounts = HashMap<String, u32>;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    /// Short code handed to the customer.
    pub reference: String,
    pub event_date: NaiveDate,
    pub time_block_id: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub child_name: Option<String>,
    pub adults: i32,
    pub kids: i32,
    pub payment_method: String,
    pub draft: Json<ReservationDraft>,
    pub pricing: Json<PricingBreakdown>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub event_date: NaiveDate,
    pub time_block_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub customer_name: String,
    pub customer_email: String,
    pub draft: ReservationDraft,
    pub pricing: PricingBreakdown,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let reference: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();

        Self {
            id: Uuid::new_v4().to_string(),
            reference,
            event_date: params.event_date,
            time_block_id: params.time_block_id,
            start_time: params.start_time,
            end_time: params.end_time,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.draft.customer_phone.clone(),
            child_name: params.draft.child_name.clone(),
            adults: i32::try_from(params.draft.adults).unwrap_or(i32::MAX),
            kids: i32::try_from(params.draft.kids).unwrap_or(i32::MAX),
            payment_method: params.draft.payment_method.as_str().to_string(),
            draft: Json(params.draft),
            pricing: Json(params.pricing),
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        }
    }
}

pub fn is_valid_status(status: &str) -> bool {
    matches!(status, STATUS_PENDING | STATUS_CONFIRMED | STATUS_CANCELLED)
}

/// Pending and confirmed bookings hold a seat in their slot.
pub fn occupies_capacity(status: &str) -> bool {
    status != STATUS_CANCELLED
}

/// How many more bookings a slot (or, with one event per day, the date) accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLimit {
    pub max_in_block: u32,
    pub one_event_per_day: bool,
}
