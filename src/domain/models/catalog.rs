use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PackagePricing {
    pub weekday: Decimal,
    pub weekend: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PackageOption {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Tiered pricing. Older packages only carry `base_price`.
    #[serde(default)]
    pub pricing: Option<PackagePricing>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    pub max_guests: u32,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "active")]
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FoodDishes {
    pub adult: Vec<String>,
    pub kids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UpgradeOption {
    pub from_dish: String,
    pub to_dish: String,
    pub additional_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FoodUpgrades {
    pub adult: Vec<UpgradeOption>,
    pub kids: Vec<UpgradeOption>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodOption {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub adult_price: Option<Decimal>,
    #[serde(default)]
    pub kids_price: Option<Decimal>,
    #[serde(default)]
    pub dishes: FoodDishes,
    #[serde(default)]
    pub upgrades: FoodUpgrades,
    #[serde(default = "active")]
    pub active: bool,
}

impl FoodOption {
    pub fn adult_unit_price(&self) -> Decimal {
        self.adult_price.unwrap_or(self.base_price)
    }

    pub fn kids_unit_price(&self) -> Decimal {
        self.kids_price.unwrap_or(self.base_price)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ThemePackage {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventTheme {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub packages: Vec<ThemePackage>,
    /// Character/name variations offered for the theme.
    #[serde(default)]
    pub theme_names: Vec<String>,
    #[serde(default = "active")]
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtraService {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default = "active")]
    pub active: bool,
}

fn active() -> bool {
    true
}

/// Storage discriminator for catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Package,
    Food,
    Theme,
    Extra,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Package => "PACKAGE",
            CatalogKind::Food => "FOOD",
            CatalogKind::Theme => "THEME",
            CatalogKind::Extra => "EXTRA",
        }
    }
}

/// Everything the pricing calculator reads, loaded in one go.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub packages: Vec<PackageOption>,
    pub food_options: Vec<FoodOption>,
    pub themes: Vec<EventTheme>,
    pub extras: Vec<ExtraService>,
}
