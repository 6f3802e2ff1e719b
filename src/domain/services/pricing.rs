use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::domain::models::catalog::{Catalog, EventTheme, ExtraService, FoodOption, PackageOption, UpgradeOption};
use crate::domain::models::draft::{DishCategory, FoodUpgradeSelection, ReservationDraft};
use crate::domain::models::payment::{DiscountScope, PaymentMethod, PricingBreakdown, RateTier};
use crate::domain::services::availability::day_of_week;

const DECIMAL_PLACES: u32 = 2;

/// Friday, Saturday and Sunday are billed at the weekend rate.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(day_of_week(date), 0 | 5 | 6)
}

/// Unknown dates fall back to the weekday tier.
pub fn rate_tier(date: Option<NaiveDate>) -> RateTier {
    match date {
        Some(d) if is_weekend(d) => RateTier::Weekend,
        _ => RateTier::Weekday,
    }
}

#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub fn package_price(package: &PackageOption, tier: RateTier) -> Decimal {
    match (&package.pricing, tier) {
        (Some(p), RateTier::Weekday) => p.weekday,
        (Some(p), RateTier::Weekend) => p.weekend,
        (None, _) => package.base_price.unwrap_or(Decimal::ZERO),
    }
}

/// Amounts clamp at the `Decimal` bounds instead of overflowing.
fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

fn per_head(unit: Decimal, guests: u32) -> Decimal {
    unit.saturating_mul(Decimal::from(guests))
}

/// The catalog entry a selected upgrade refers to, matched on category and dish pair.
pub fn catalog_upgrade<'a>(food: &'a FoodOption, upgrade: &FoodUpgradeSelection) -> Option<&'a UpgradeOption> {
    let offered = match upgrade.category {
        DishCategory::Adult => &food.upgrades.adult,
        DishCategory::Kids => &food.upgrades.kids,
    };
    offered.iter().find(|o| o.from_dish == upgrade.from_dish && o.to_dish == upgrade.to_dish)
}

fn find_by_id<'a, T>(items: &'a [T], id: Option<&str>, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    let id = id?;
    items.iter().find(|item| key(item) == id)
}

/// Itemized price for a draft. Missing selections contribute zero; this never fails.
///
/// Food upgrades add the catalog `additional_price` once per selected upgrade; the
/// price carried in the draft is ignored. The per-guest figure the wizard shows
/// is `FoodUpgradeSelection::display_total`.
pub fn calculate_pricing(
    draft: &ReservationDraft,
    packages: &[PackageOption],
    food_options: &[FoodOption],
    themes: &[EventTheme],
    extras: &[ExtraService],
) -> PricingBreakdown {
    let tier = rate_tier(draft.event_date);

    let base_price = find_by_id(packages, draft.package_id.as_deref(), |p| p.id.as_str())
        .map(|p| package_price(p, tier))
        .unwrap_or(Decimal::ZERO);

    let food = find_by_id(food_options, draft.food_option_id.as_deref(), |f| f.id.as_str());

    let food_price = food
        .map(|f| per_head(f.adult_unit_price(), draft.adults).saturating_add(per_head(f.kids_unit_price(), draft.kids)))
        .unwrap_or(Decimal::ZERO);

    let upgrades_price = match food {
        Some(f) => sum(draft.food_upgrades.iter().filter_map(|u| catalog_upgrade(f, u)).map(|o| o.additional_price)),
        None => Decimal::ZERO,
    };

    let theme_price = find_by_id(themes, draft.theme_id.as_deref(), |t| t.id.as_str())
        .and_then(|theme| find_by_id(&theme.packages, draft.theme_package_id.as_deref(), |p| p.id.as_str()))
        .map(|p| p.price)
        .unwrap_or(Decimal::ZERO);

    let extras_price = sum(draft.extra_service_ids()
        .filter_map(|id| extras.iter().find(|e| e.id == id))
        .map(|e| e.price));

    let subtotal = sum([base_price, food_price, upgrades_price, theme_price, extras_price]);

    let cash_discount_amount = match &draft.cash_discount {
        Some(settings) if draft.payment_method == PaymentMethod::Cash && settings.enabled => {
            // No deposit split at this layer; both scopes discount the subtotal.
            let base = match settings.applies_to {
                DiscountScope::Remaining => subtotal,
                DiscountScope::Total => subtotal,
            };
            round2(base.saturating_mul(settings.percentage) / Decimal::ONE_HUNDRED)
        }
        _ => Decimal::ZERO,
    };

    let coupon_discount = Decimal::ZERO;

    PricingBreakdown {
        rate_tier: tier,
        base_price,
        food_price,
        upgrades_price,
        theme_price,
        extras_price,
        subtotal,
        cash_discount_amount,
        coupon_discount,
        total: subtotal.saturating_sub(cash_discount_amount).saturating_sub(coupon_discount),
    }
}

pub fn calculate_for_catalog(draft: &ReservationDraft, catalog: &Catalog) -> PricingBreakdown {
    calculate_pricing(draft, &catalog.packages, &catalog.food_options, &catalog.themes, &catalog.extras)
}

/// A selection that silently priced at zero because it pointed at nothing.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityWarning {
    UnknownPackage { id: String },
    UnknownFoodOption { id: String },
    UnknownTheme { id: String },
    UnknownThemePackage { id: String },
    UnknownExtraService { id: String },
    UnknownUpgrade { from_dish: String, to_dish: String },
    UpgradeWithoutFood,
}

pub fn audit_draft(draft: &ReservationDraft, catalog: &Catalog) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();

    if let Some(id) = &draft.package_id
        && !catalog.packages.iter().any(|p| &p.id == id) {
        warnings.push(DataQualityWarning::UnknownPackage { id: id.clone() });
    }

    match &draft.food_option_id {
        Some(id) => match catalog.food_options.iter().find(|f| &f.id == id) {
            Some(food) => {
                for upgrade in &draft.food_upgrades {
                    if catalog_upgrade(food, upgrade).is_none() {
                        warnings.push(DataQualityWarning::UnknownUpgrade {
                            from_dish: upgrade.from_dish.clone(),
                            to_dish: upgrade.to_dish.clone(),
                        });
                    }
                }
            }
            None => warnings.push(DataQualityWarning::UnknownFoodOption { id: id.clone() }),
        },
        None if !draft.food_upgrades.is_empty() => warnings.push(DataQualityWarning::UpgradeWithoutFood),
        None => {}
    }

    if let Some(id) = &draft.theme_id {
        match catalog.themes.iter().find(|t| &t.id == id) {
            Some(theme) => {
                if let Some(pkg) = &draft.theme_package_id
                    && !theme.packages.iter().any(|p| &p.id == pkg) {
                    warnings.push(DataQualityWarning::UnknownThemePackage { id: pkg.clone() });
                }
            }
            None => warnings.push(DataQualityWarning::UnknownTheme { id: id.clone() }),
        }
    }

    for id in draft.extra_service_ids() {
        if !catalog.extras.iter().any(|e| e.id == id) {
            warnings.push(DataQualityWarning::UnknownExtraService { id: id.to_string() });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::catalog::{FoodDishes, FoodUpgrades, PackagePricing, ThemePackage};
    use crate::domain::models::draft::FoodUpgradeSelection;
    use crate::domain::models::payment::CashDiscountSettings;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn catalog() -> Catalog {
        Catalog {
            packages: vec![
                PackageOption {
                    id: "fiesta".into(),
                    name: "Fiesta".into(),
                    description: String::new(),
                    pricing: Some(PackagePricing { weekday: d(2500), weekend: d(3000) }),
                    base_price: None,
                    max_guests: 50,
                    duration: 3.5,
                    features: vec![],
                    active: true,
                },
                PackageOption {
                    id: "legacy".into(),
                    name: "Clásico".into(),
                    description: String::new(),
                    pricing: None,
                    base_price: Some(d(1800)),
                    max_guests: 30,
                    duration: 3.0,
                    features: vec![],
                    active: true,
                },
            ],
            food_options: vec![FoodOption {
                id: "tacos".into(),
                name: "Taquiza".into(),
                description: String::new(),
                base_price: d(120),
                adult_price: Some(d(150)),
                kids_price: Some(d(100)),
                dishes: FoodDishes { adult: vec!["Agua".into()], kids: vec!["Nuggets".into()] },
                upgrades: FoodUpgrades {
                    adult: vec![UpgradeOption { from_dish: "Agua".into(), to_dish: "Refresco".into(), additional_price: d(25) }],
                    kids: vec![],
                },
                active: true,
            }],
            themes: vec![EventTheme {
                id: "space".into(),
                name: "Espacio".into(),
                description: String::new(),
                packages: vec![ThemePackage { id: "deluxe".into(), name: "Deluxe".into(), price: d(650) }],
                theme_names: vec!["Astronauta".into()],
                active: true,
            }],
            extras: vec![
                ExtraService { id: "dj".into(), name: "DJ".into(), description: String::new(), price: d(900), category: "music".into(), active: true },
                ExtraService { id: "photo".into(), name: "Foto".into(), description: String::new(), price: d(450), category: "media".into(), active: true },
            ],
        }
    }

    // 2026-10-24 is a Saturday.
    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 24).unwrap()
    }

    fn cash_5_percent() -> CashDiscountSettings {
        CashDiscountSettings {
            enabled: true,
            percentage: d(5),
            description: "5% en efectivo".into(),
            applies_to: DiscountScope::Remaining,
        }
    }

    #[test]
    fn test_weekend_is_friday_to_sunday() {
        let expected = [
            (18, true),  // Sunday
            (19, false), // Monday
            (20, false),
            (21, false),
            (22, false), // Thursday
            (23, true),  // Friday
            (24, true),  // Saturday
        ];
        for (day, weekend) in expected {
            let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
            assert_eq!(is_weekend(date), weekend, "2026-10-{}", day);
        }
        assert_eq!(RateTier::Weekend.label(), "Friday to Sunday");
    }

    #[test]
    fn test_saturday_cash_scenario() {
        let draft = ReservationDraft {
            adults: 4,
            kids: 2,
            package_id: Some("fiesta".into()),
            food_option_id: Some("tacos".into()),
            event_date: Some(saturday()),
            payment_method: PaymentMethod::Cash,
            cash_discount: Some(cash_5_percent()),
            ..Default::default()
        };

        let b = calculate_for_catalog(&draft, &catalog());
        assert_eq!(b.rate_tier, RateTier::Weekend);
        assert_eq!(b.base_price, d(3000));
        assert_eq!(b.food_price, d(800));
        assert_eq!(b.subtotal, d(3800));
        assert_eq!(b.cash_discount_amount, d(190));
        assert_eq!(b.total, d(3610));
    }

    #[test]
    fn test_friday_uses_weekend_rate_and_thursday_weekday() {
        let friday = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        let thursday = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let mut draft = ReservationDraft { package_id: Some("fiesta".into()), event_date: Some(friday), ..Default::default() };
        assert_eq!(calculate_for_catalog(&draft, &catalog()).base_price, d(3000));

        draft.event_date = Some(thursday);
        assert_eq!(calculate_for_catalog(&draft, &catalog()).base_price, d(2500));
    }

    #[test]
    fn test_legacy_base_price_ignores_tier() {
        let draft = ReservationDraft { package_id: Some("legacy".into()), event_date: Some(saturday()), ..Default::default() };
        assert_eq!(calculate_for_catalog(&draft, &catalog()).base_price, d(1800));
    }

    #[test]
    fn test_food_units_fall_back_to_base_price() {
        let mut cat = catalog();
        cat.food_options[0].kids_price = None;
        let draft = ReservationDraft { adults: 2, kids: 3, food_option_id: Some("tacos".into()), ..Default::default() };
        assert_eq!(calculate_for_catalog(&draft, &cat).food_price, d(150 * 2 + 120 * 3));
    }

    fn upgrade(from: &str, to: &str, price: i64, category: DishCategory) -> FoodUpgradeSelection {
        FoodUpgradeSelection {
            from_dish: from.into(),
            to_dish: to.into(),
            additional_price: d(price),
            category,
            quantity: None,
        }
    }

    #[test]
    fn test_upgrades_are_added_once_not_per_guest() {
        let draft = ReservationDraft {
            adults: 10,
            food_option_id: Some("tacos".into()),
            food_upgrades: vec![upgrade("Agua", "Refresco", 25, DishCategory::Adult)],
            ..Default::default()
        };
        let b = calculate_for_catalog(&draft, &catalog());
        assert_eq!(b.upgrades_price, d(25));
        assert_eq!(draft.food_upgrades[0].display_total(draft.adults, draft.kids), d(250));
    }

    #[test]
    fn test_upgrade_price_comes_from_catalog() {
        let draft = ReservationDraft {
            adults: 2,
            food_option_id: Some("tacos".into()),
            food_upgrades: vec![
                upgrade("Agua", "Refresco", -5000, DishCategory::Adult),
                // Offered for adults only
                upgrade("Agua", "Refresco", 1, DishCategory::Kids),
                upgrade("Agua", "Champagne", 1, DishCategory::Adult),
            ],
            ..Default::default()
        };
        let cat = catalog();
        let b = calculate_for_catalog(&draft, &cat);
        assert_eq!(b.upgrades_price, d(25));
        assert_eq!(b.subtotal, d(300 + 25));

        assert_eq!(audit_draft(&draft, &cat), vec![
            DataQualityWarning::UnknownUpgrade { from_dish: "Agua".into(), to_dish: "Refresco".into() },
            DataQualityWarning::UnknownUpgrade { from_dish: "Agua".into(), to_dish: "Champagne".into() },
        ]);
    }

    #[test]
    fn test_upgrades_without_food_price_to_zero() {
        let draft = ReservationDraft {
            food_upgrades: vec![upgrade("Agua", "Refresco", 25, DishCategory::Adult)],
            ..Default::default()
        };
        assert_eq!(calculate_for_catalog(&draft, &catalog()).upgrades_price, Decimal::ZERO);
        assert_eq!(audit_draft(&draft, &catalog()), vec![DataQualityWarning::UpgradeWithoutFood]);
    }

    #[test]
    fn test_huge_amounts_clamp_instead_of_overflowing() {
        let mut cat = catalog();
        cat.food_options[0].adult_price = Some(Decimal::MAX);
        cat.extras[0].price = Decimal::MAX;
        cat.extras[1].price = Decimal::MAX;
        let draft = ReservationDraft {
            adults: u32::MAX,
            kids: u32::MAX,
            package_id: Some("fiesta".into()),
            food_option_id: Some("tacos".into()),
            selected_extra_services: "dj,photo".into(),
            payment_method: PaymentMethod::Cash,
            cash_discount: Some(cash_5_percent()),
            ..Default::default()
        };

        let b = calculate_for_catalog(&draft, &cat);
        assert_eq!(b.food_price, Decimal::MAX);
        assert_eq!(b.extras_price, Decimal::MAX);
        assert_eq!(b.subtotal, Decimal::MAX);
        assert!(b.cash_discount_amount > Decimal::ZERO);
        assert_eq!(b.total, b.subtotal - b.cash_discount_amount);
    }

    #[test]
    fn test_theme_and_extras() {
        let draft = ReservationDraft {
            theme_id: Some("space".into()),
            theme_package_id: Some("deluxe".into()),
            selected_extra_services: "dj,photo,unknown".into(),
            ..Default::default()
        };
        let b = calculate_for_catalog(&draft, &catalog());
        assert_eq!(b.theme_price, d(650));
        assert_eq!(b.extras_price, d(1350));
        assert_eq!(b.subtotal, d(2000));
        assert_eq!(b.total, b.subtotal);

        let no_sub_package = ReservationDraft { theme_id: Some("space".into()), ..Default::default() };
        assert_eq!(calculate_for_catalog(&no_sub_package, &catalog()).theme_price, Decimal::ZERO);
    }

    #[test]
    fn test_empty_draft_prices_to_zero() {
        let b = calculate_for_catalog(&ReservationDraft::default(), &catalog());
        assert_eq!(b.total, Decimal::ZERO);
        assert_eq!(b.rate_tier, RateTier::Weekday);
    }

    #[test]
    fn test_cash_discount_requires_cash_and_enabled() {
        let mut draft = ReservationDraft {
            package_id: Some("fiesta".into()),
            event_date: Some(saturday()),
            payment_method: PaymentMethod::Transfer,
            cash_discount: Some(cash_5_percent()),
            ..Default::default()
        };
        assert_eq!(calculate_for_catalog(&draft, &catalog()).cash_discount_amount, Decimal::ZERO);

        draft.payment_method = PaymentMethod::Cash;
        draft.cash_discount = Some(CashDiscountSettings { enabled: false, ..cash_5_percent() });
        assert_eq!(calculate_for_catalog(&draft, &catalog()).cash_discount_amount, Decimal::ZERO);

        draft.cash_discount = Some(CashDiscountSettings { applies_to: DiscountScope::Total, ..cash_5_percent() });
        assert_eq!(calculate_for_catalog(&draft, &catalog()).cash_discount_amount, d(150));
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        let draft = ReservationDraft {
            selected_extra_services: "photo".into(),
            payment_method: PaymentMethod::Cash,
            cash_discount: Some(CashDiscountSettings { percentage: Decimal::new(333, 2), ..cash_5_percent() }),
            ..Default::default()
        };
        let b = calculate_for_catalog(&draft, &catalog());
        // 450 * 3.33% = 14.985
        assert_eq!(b.cash_discount_amount, Decimal::new(1499, 2));
        assert_eq!(b.total, b.subtotal - b.cash_discount_amount);
    }

    #[test]
    fn test_pricing_is_deterministic() {
        let draft = ReservationDraft {
            adults: 7,
            kids: 9,
            package_id: Some("fiesta".into()),
            food_option_id: Some("tacos".into()),
            selected_extra_services: "dj".into(),
            event_date: Some(saturday()),
            ..Default::default()
        };
        let cat = catalog();
        assert_eq!(calculate_for_catalog(&draft, &cat), calculate_for_catalog(&draft, &cat));
    }

    #[test]
    fn test_audit_flags_dangling_references() {
        let draft = ReservationDraft {
            package_id: Some("gone".into()),
            food_option_id: Some("tacos".into()),
            food_upgrades: vec![upgrade("Pozole", "Birria", 40, DishCategory::Adult)],
            theme_id: Some("space".into()),
            theme_package_id: Some("basic".into()),
            selected_extra_services: "dj,karaoke".into(),
            ..Default::default()
        };
        let warnings = audit_draft(&draft, &catalog());
        assert_eq!(warnings, vec![
            DataQualityWarning::UnknownPackage { id: "gone".into() },
            DataQualityWarning::UnknownUpgrade { from_dish: "Pozole".into(), to_dish: "Birria".into() },
            DataQualityWarning::UnknownThemePackage { id: "basic".into() },
            DataQualityWarning::UnknownExtraService { id: "karaoke".into() },
        ]);
    }
}
