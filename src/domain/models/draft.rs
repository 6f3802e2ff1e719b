use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::models::payment::{CashDiscountSettings, PaymentMethod};
use crate::domain::models::schedule::hhmm;

/// Guest counts arrive from form fields: numbers, numeric strings, blanks or junk.
/// Anything that does not start with digits counts as zero.
pub mod lenient_count {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt;

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a guest count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            Ok(u32::try_from(v).unwrap_or(u32::MAX))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            Ok(if v < 0 { 0 } else { u32::try_from(v).unwrap_or(u32::MAX) })
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            if v.is_finite() && v > 0.0 {
                Ok(v.trunc().min(u32::MAX as f64) as u32)
            } else {
                Ok(0)
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            Ok(parse(v))
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<u32, D::Error> {
            d.deserialize_any(CountVisitor)
        }
    }

    pub fn parse(raw: &str) -> u32 {
        let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(if digits.is_empty() { 0 } else { u32::MAX })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        deserializer.deserialize_any(CountVisitor)
    }

    /// Absent or null means "not provided"; anything else is coerced.
    pub mod option {
        use serde::{Deserialize, Deserializer};
        use serde_json::Value;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
            let value = Option::<Value>::deserialize(deserializer)?;
            Ok(match value {
                None | Some(Value::Null) => None,
                Some(Value::Number(n)) => Some(match (n.as_u64(), n.as_f64()) {
                    (Some(u), _) => u32::try_from(u).unwrap_or(u32::MAX),
                    (None, Some(f)) if f.is_finite() && f > 0.0 => f.trunc().min(u32::MAX as f64) as u32,
                    _ => 0,
                }),
                Some(Value::String(s)) => Some(super::parse(&s)),
                Some(_) => Some(0),
            })
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DishCategory {
    Adult,
    Kids,
}

/// A dish swap applied to every guest of one category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodUpgradeSelection {
    pub from_dish: String,
    pub to_dish: String,
    pub additional_price: Decimal,
    pub category: DishCategory,
    /// Informational; defaults to the headcount of `category`.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl FoodUpgradeSelection {
    pub fn quantity_for(&self, adults: u32, kids: u32) -> u32 {
        self.quantity.unwrap_or(match self.category {
            DishCategory::Adult => adults,
            DishCategory::Kids => kids,
        })
    }

    /// What the wizard shows as "total for N guests". Not used for pricing.
    pub fn display_total(&self, adults: u32, kids: u32) -> Decimal {
        self.additional_price.saturating_mul(Decimal::from(self.quantity_for(adults, kids)))
    }
}

/// The in-progress reservation assembled across the wizard steps.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ReservationDraft {
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub adults: u32,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub kids: u32,
    pub package_id: Option<String>,
    pub food_option_id: Option<String>,
    pub food_upgrades: Vec<FoodUpgradeSelection>,
    pub theme_id: Option<String>,
    pub theme_package_id: Option<String>,
    pub theme_name: Option<String>,
    /// Comma-delimited extra service ids.
    pub selected_extra_services: String,
    pub event_date: Option<NaiveDate>,
    pub time_block_id: Option<String>,
    #[serde(with = "hhmm::option")]
    pub event_time: Option<NaiveTime>,
    pub payment_method: PaymentMethod,
    /// Snapshot of the venue cash discount, present only for cash payments.
    pub cash_discount: Option<CashDiscountSettings>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<u32>,
    pub special_comments: Option<String>,
}

impl ReservationDraft {
    pub fn total_guests(&self) -> u32 {
        self.adults.saturating_add(self.kids)
    }

    pub fn extra_service_ids(&self) -> impl Iterator<Item = &str> {
        self.selected_extra_services
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A partial update coming from one wizard step. `None` leaves the field untouched,
/// an empty string clears an optional selection.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DraftPatch {
    #[serde(deserialize_with = "lenient_count::option::deserialize")]
    pub adults: Option<u32>,
    #[serde(deserialize_with = "lenient_count::option::deserialize")]
    pub kids: Option<u32>,
    pub package_id: Option<String>,
    pub food_option_id: Option<String>,
    pub food_upgrades: Option<Vec<FoodUpgradeSelection>>,
    pub theme_id: Option<String>,
    pub theme_package_id: Option<String>,
    pub theme_name: Option<String>,
    pub selected_extra_services: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub time_block_id: Option<String>,
    #[serde(with = "hhmm::option")]
    pub event_time: Option<NaiveTime>,
    pub payment_method: Option<PaymentMethod>,
    /// Filled in by the server from the venue settings.
    #[serde(skip_deserializing)]
    pub cash_discount: Option<CashDiscountSettings>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<u32>,
    pub special_comments: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn set_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        *target = non_empty(v);
    }
}

/// Upgrades are all-or-nothing per dish: a later swap of the same dish replaces the earlier one.
fn dedupe_upgrades(upgrades: Vec<FoodUpgradeSelection>) -> Vec<FoodUpgradeSelection> {
    let mut result: Vec<FoodUpgradeSelection> = Vec::with_capacity(upgrades.len());
    for upgrade in upgrades {
        if let Some(existing) = result.iter_mut()
            .find(|u| u.category == upgrade.category && u.from_dish == upgrade.from_dish) {
            *existing = upgrade;
        } else {
            result.push(upgrade);
        }
    }
    result
}

pub fn apply_update(draft: &ReservationDraft, patch: DraftPatch) -> ReservationDraft {
    let mut next = draft.clone();

    if let Some(v) = patch.adults { next.adults = v; }
    if let Some(v) = patch.kids { next.kids = v; }

    set_optional(&mut next.package_id, patch.package_id);

    if let Some(food) = patch.food_option_id {
        let food = non_empty(food);
        if food != next.food_option_id {
            next.food_upgrades.clear();
        }
        next.food_option_id = food;
    }
    if let Some(upgrades) = patch.food_upgrades {
        next.food_upgrades = if next.food_option_id.is_some() { dedupe_upgrades(upgrades) } else { Vec::new() };
    }

    if let Some(theme) = patch.theme_id {
        let theme = non_empty(theme);
        if theme != next.theme_id {
            next.theme_package_id = None;
            next.theme_name = None;
        }
        next.theme_id = theme;
    }
    set_optional(&mut next.theme_package_id, patch.theme_package_id);
    set_optional(&mut next.theme_name, patch.theme_name);

    if let Some(extras) = patch.selected_extra_services {
        next.selected_extra_services = extras
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");
    }

    if let Some(date) = patch.event_date {
        if Some(date) != next.event_date {
            next.time_block_id = None;
            next.event_time = None;
        }
        next.event_date = Some(date);
    }
    set_optional(&mut next.time_block_id, patch.time_block_id);
    if patch.event_time.is_some() { next.event_time = patch.event_time; }

    if let Some(method) = patch.payment_method { next.payment_method = method; }
    if next.payment_method == PaymentMethod::Cash {
        if patch.cash_discount.is_some() {
            next.cash_discount = patch.cash_discount;
        }
    } else {
        next.cash_discount = None;
    }

    set_optional(&mut next.customer_name, patch.customer_name);
    set_optional(&mut next.customer_email, patch.customer_email);
    set_optional(&mut next.customer_phone, patch.customer_phone);
    set_optional(&mut next.child_name, patch.child_name);
    if patch.child_age.is_some() { next.child_age = patch.child_age; }
    set_optional(&mut next.special_comments, patch.special_comments);

    next
}

/// Cash drafts priced without a snapshot take the venue's current discount.
pub fn with_cash_snapshot(mut draft: ReservationDraft, venue_discount: &CashDiscountSettings) -> ReservationDraft {
    if draft.payment_method == PaymentMethod::Cash {
        if draft.cash_discount.is_none() {
            draft.cash_discount = Some(venue_discount.clone());
        }
    } else {
        draft.cash_discount = None;
    }
    draft
}

pub const DEFAULT_DRAFT_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct StoredDraft {
    #[sqlx(rename = "draft_key")]
    pub key: String,
    #[sqlx(json)]
    pub draft: ReservationDraft,
    #[sqlx(rename = "saved_at")]
    pub timestamp: DateTime<Utc>,
}

impl StoredDraft {
    pub fn new(key: String, draft: ReservationDraft) -> Self {
        Self { key, draft, timestamp: Utc::now() }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp > ttl
    }

    /// The draft without its timestamp, or `None` once older than `ttl`.
    pub fn load(self, now: DateTime<Utc>, ttl: Duration) -> Option<ReservationDraft> {
        if self.is_expired(now, ttl) { None } else { Some(self.draft) }
    }
}
