//! Derived rates and prices. Pure functions of the owned-upgrade map.

use std::collections::BTreeMap;

use super::catalog::{Catalog, UpgradeCategory, UpgradeConfig};

/// Stardust per click with no upgrades.
pub const BASE_CLICK_POWER: f64 = 1.0;

/// Owned count for `id`, 0 when absent.
pub fn owned(upgrades: &BTreeMap<String, u32>, id: &str) -> u32 {
    upgrades.get(id).copied().unwrap_or(0)
}

fn category_power(
    upgrades: &BTreeMap<String, u32>,
    catalog: &Catalog,
    category: UpgradeCategory,
) -> f64 {
    catalog
        .by_category(category)
        .map(|u| u.base_power * owned(upgrades, &u.id) as f64)
        .sum()
}

/// Stardust per manual click. Always at least [`BASE_CLICK_POWER`].
pub fn click_power(upgrades: &BTreeMap<String, u32>, catalog: &Catalog) -> f64 {
    BASE_CLICK_POWER + category_power(upgrades, catalog, UpgradeCategory::Click)
}

/// Stardust per second from automation. Zero when nothing automatic is owned.
pub fn auto_power(upgrades: &BTreeMap<String, u32>, catalog: &Catalog) -> f64 {
    category_power(upgrades, catalog, UpgradeCategory::Auto)
}

/// `floor(base_cost * cost_multiplier^owned)`, in f64 so large counts grow
/// towards infinity instead of wrapping.
pub fn cost(base_cost: f64, cost_multiplier: f64, owned: u32) -> f64 {
    let growth = match i32::try_from(owned) {
        Ok(n) => cost_multiplier.powi(n),
        Err(_) => cost_multiplier.powf(owned as f64),
    };
    (base_cost * growth).floor()
}

/// Price of the next unit of `upgrade` given what is already owned.
pub fn next_cost(upgrade: &UpgradeConfig, upgrades: &BTreeMap<String, u32>) -> f64 {
    cost(
        upgrade.base_cost,
        upgrade.cost_multiplier,
        owned(upgrades, &upgrade.id),
    )
}

pub fn can_afford(stardust: f64, cost: f64) -> bool {
    cost.is_finite() && stardust >= cost
}
