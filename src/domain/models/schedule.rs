use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `"HH:MM"` (24h) serialization for times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Accepts `HH:MM` and, for stored values, `HH:MM:SS`.
    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| format!("invalid time of day '{}', expected HH:MM", raw))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => super::serialize(t, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw.as_deref() {
                None | Some("") => Ok(None),
                Some(s) => super::parse(s).map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}

/// A named, recurring weekly availability window.
///
/// `days` uses 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeBlock {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub days: BTreeSet<u8>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Bookable event length in hours.
    pub duration: f64,
    #[serde(default)]
    pub half_hour_break: bool,
    #[serde(default = "default_max_events")]
    pub max_events_per_block: u32,
}

fn default_max_events() -> u32 {
    1
}

impl TimeBlock {
    pub fn covers_day(&self, day: u8) -> bool {
        self.days.contains(&day)
    }

    pub fn shares_day_with(&self, other: &TimeBlock) -> bool {
        self.days.intersection(&other.days).next().is_some()
    }
}

/// A weekday the venue is closed by default.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RestDay {
    pub day: u8,
    pub name: String,
    #[serde(default)]
    pub fee: Decimal,
    #[serde(default)]
    pub can_be_released: bool,
}

/// A rest day opened for one specific calendar date.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RestDayRelease {
    pub date: NaiveDate,
    pub fee: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RestDayRelease {
    pub fn new(date: NaiveDate, fee: Decimal, note: Option<String>) -> Self {
        Self {
            date,
            fee,
            note,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScheduleSettings {
    pub min_advance_booking_days: i64,
    pub max_advance_booking_days: i64,
    /// When set, any booking on a date consumes the whole date.
    pub one_event_per_day: bool,
    pub max_concurrent_events: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            min_advance_booking_days: 1,
            max_advance_booking_days: 180,
            one_event_per_day: false,
            max_concurrent_events: 1,
        }
    }
}

/// Everything the availability resolver needs, as configured by the admin panel.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ScheduleConfiguration {
    #[serde(flatten)]
    pub settings: ScheduleSettings,
    pub time_blocks: Vec<TimeBlock>,
    pub rest_days: Vec<RestDay>,
}

impl ScheduleConfiguration {
    pub fn rest_day_for(&self, day: u8) -> Option<&RestDay> {
        self.rest_days.iter().find(|r| r.day == day)
    }
}

pub fn new_block_id() -> String {
    Uuid::new_v4().to_string()
}
