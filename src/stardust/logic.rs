//! Stardust state transitions: pure functions over `&mut GameState`,
//! fully testable.

use super::catalog::Catalog;
use super::economy;
use super::state::{GameState, PurchaseOutcome};

/// Manual click worth `power`. Non-positive or non-finite powers are ignored;
/// a validated catalog never produces one.
pub fn apply_click(state: &mut GameState, power: f64) {
    if !power.is_finite() || power <= 0.0 {
        return;
    }
    state.stardust += power;
    state.lifetime_stardust += power;
    state.click_count += 1;
}

/// Passive production of `rate_per_sec` over `elapsed_secs`.
pub fn apply_auto_tick(state: &mut GameState, rate_per_sec: f64, elapsed_secs: f64) {
    let gain = rate_per_sec * elapsed_secs;
    if !gain.is_finite() || gain <= 0.0 {
        return;
    }
    state.stardust += gain;
    state.lifetime_stardust += gain;
}

/// Buy one unit of upgrade `id` at its current price.
///
/// The price is always recomputed from the catalog. Unknown ids and
/// unaffordable purchases leave the state untouched.
pub fn purchase_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> PurchaseOutcome {
    let Some(upgrade) = catalog.get(id) else {
        return PurchaseOutcome::UnknownUpgrade;
    };
    let cost = economy::next_cost(upgrade, &state.upgrades);
    if !economy::can_afford(state.stardust, cost) {
        return PurchaseOutcome::Unaffordable { cost };
    }
    state.stardust = (state.stardust - cost).max(0.0);
    *state.upgrades.entry(upgrade.id.clone()).or_insert(0) += 1;
    PurchaseOutcome::Purchased { cost }
}

/// Replace everything with a fresh game started at `now_ms`.
pub fn reset(state: &mut GameState, now_ms: f64) {
    *state = GameState::new(now_ms);
}

/// Compact display form: `1.23B`, `4.56M`, `7.8k`, or a floored integer
/// with thousands separators below 1000.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if !n.is_finite() {
        return "∞".into();
    }
    if n >= 1e9 {
        return format!("{:.2}B", n / 1e9);
    }
    if n >= 1e6 {
        return format!("{:.2}M", n / 1e6);
    }
    if n >= 1e3 {
        return format!("{:.1}k", n / 1e3);
    }
    group_thousands(n.floor() as u64)
}

/// Integer with comma separators (`1,234,567`).
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
