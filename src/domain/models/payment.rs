use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    #[default]
    Transfer,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountScope {
    #[default]
    Remaining,
    Total,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CashDiscountSettings {
    pub enabled: bool,
    /// 0-100.
    pub percentage: Decimal,
    pub description: String,
    pub applies_to: DiscountScope,
}

/// Venue-wide payment configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PaymentSettings {
    pub cash_discount: CashDiscountSettings,
    /// Share of the total requested up front, 0-100.
    pub deposit_percentage: Decimal,
    pub bank_details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    Weekday,
    Weekend,
}

impl RateTier {
    pub fn label(&self) -> &'static str {
        match self {
            RateTier::Weekday => "Monday to Thursday",
            RateTier::Weekend => "Friday to Sunday",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricingBreakdown {
    pub rate_tier: RateTier,
    pub base_price: Decimal,
    pub food_price: Decimal,
    pub upgrades_price: Decimal,
    pub theme_price: Decimal,
    pub extras_price: Decimal,
    pub subtotal: Decimal,
    pub cash_discount_amount: Decimal,
    /// Always zero until coupons exist.
    pub coupon_discount: Decimal,
    pub total: Decimal,
}
