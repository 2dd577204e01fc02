//! Stardust game state definitions.

use std::collections::BTreeMap;

use super::economy;

/// The single authoritative, persisted game state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable stardust. Never negative.
    pub stardust: f64,
    /// Total stardust ever earned. Only grows.
    pub lifetime_stardust: f64,
    /// Manual clicks count.
    pub click_count: u64,
    /// Upgrade id → owned count. May contain ids the current catalog no
    /// longer defines; those are carried through saves untouched.
    pub upgrades: BTreeMap<String, u32>,
    /// Creation time, Unix epoch milliseconds.
    pub start_time: f64,
}

impl GameState {
    /// A fresh game started at `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            stardust: 0.0,
            lifetime_stardust: 0.0,
            click_count: 0,
            upgrades: BTreeMap::new(),
            start_time: now_ms,
        }
    }

    pub fn owned(&self, id: &str) -> u32 {
        economy::owned(&self.upgrades, id)
    }
}

/// Result of a purchase attempt. Only `Purchased` changes state.
#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    Purchased { cost: f64 },
    /// Not enough stardust.
    Unaffordable { cost: f64 },
    /// Id not in the catalog (stale UI reference).
    UnknownUpgrade,
}

impl PurchaseOutcome {
    pub fn is_purchased(&self) -> bool {
        matches!(self, PurchaseOutcome::Purchased { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let s = GameState::new(1_700_000_000_000.0);
        assert_eq!(s.stardust, 0.0);
        assert_eq!(s.lifetime_stardust, 0.0);
        assert_eq!(s.click_count, 0);
        assert!(s.upgrades.is_empty());
        assert_eq!(s.start_time, 1_700_000_000_000.0);
    }

    #[test]
    fn owned_defaults_to_zero() {
        let mut s = GameState::new(0.0);
        assert_eq!(s.owned("dust_probe"), 0);
        s.upgrades.insert("dust_probe".into(), 3);
        assert_eq!(s.owned("dust_probe"), 3);
    }

    #[test]
    fn only_purchased_counts_as_purchased() {
        assert!(PurchaseOutcome::Purchased { cost: 10.0 }.is_purchased());
        assert!(!PurchaseOutcome::Unaffordable { cost: 10.0 }.is_purchased());
        assert!(!PurchaseOutcome::UnknownUpgrade.is_purchased());
    }
}
