//! Upgrade catalog: the static set of things stardust can buy.

use std::collections::HashSet;

use thiserror::Error;

/// Which derived rate an upgrade feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeCategory {
    /// Adds stardust per manual click.
    Click,
    /// Adds stardust per second, passively.
    Auto,
}

impl UpgradeCategory {
    /// Panel title.
    pub fn title(&self) -> &'static str {
        match self {
            UpgradeCategory::Click => "Tools (Click)",
            UpgradeCategory::Auto => "Automation (Idle)",
        }
    }
}

/// A single purchasable upgrade definition.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeConfig {
    pub id: String,
    pub name: String,
    pub category: UpgradeCategory,
    /// Price of the first unit.
    pub base_cost: f64,
    /// Click: stardust per click per unit. Auto: stardust per second per unit.
    pub base_power: f64,
    /// Growth of the price per owned unit. Always > 1.
    pub cost_multiplier: f64,
    pub description: String,
    /// Single glyph shown next to the name.
    pub icon: String,
}

impl UpgradeConfig {
    pub fn new(
        id: &str,
        name: &str,
        category: UpgradeCategory,
        base_cost: f64,
        base_power: f64,
        cost_multiplier: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            base_cost,
            base_power,
            cost_multiplier,
            description: String::new(),
            icon: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.into();
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("upgrade id must not be empty")]
    EmptyId,
    #[error("duplicate upgrade id: {0}")]
    DuplicateId(String),
    #[error("upgrade {id}: base cost must be finite and > 0 (got {value})")]
    InvalidCost { id: String, value: f64 },
    #[error("upgrade {id}: base power must be finite and >= 0 (got {value})")]
    InvalidPower { id: String, value: f64 },
    #[error("upgrade {id}: cost multiplier must be finite and > 1 (got {value})")]
    InvalidMultiplier { id: String, value: f64 },
    /// `base_cost * (cost_multiplier - 1) < 1`: flooring would let two
    /// consecutive units cost the same.
    #[error("upgrade {id}: cost curve too flat to strictly increase after flooring")]
    FlatCostCurve { id: String },
}

/// Validated, immutable upgrade catalog in display order.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<UpgradeConfig>,
}

impl Catalog {
    /// Validate and build a catalog. Numeric problems are caught here so that
    /// click and purchase paths never see a negative power or a shrinking cost.
    pub fn new(entries: Vec<UpgradeConfig>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for u in &entries {
            if u.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(u.id.as_str()) {
                return Err(CatalogError::DuplicateId(u.id.clone()));
            }
            if !u.base_cost.is_finite() || u.base_cost <= 0.0 {
                return Err(CatalogError::InvalidCost {
                    id: u.id.clone(),
                    value: u.base_cost,
                });
            }
            if !u.base_power.is_finite() || u.base_power < 0.0 {
                return Err(CatalogError::InvalidPower {
                    id: u.id.clone(),
                    value: u.base_power,
                });
            }
            if !u.cost_multiplier.is_finite() || u.cost_multiplier <= 1.0 {
                return Err(CatalogError::InvalidMultiplier {
                    id: u.id.clone(),
                    value: u.cost_multiplier,
                });
            }
            if u.base_cost * (u.cost_multiplier - 1.0) < 1.0 {
                return Err(CatalogError::FlatCostCurve { id: u.id.clone() });
            }
        }
        Ok(Self { entries })
    }

    /// The built-in catalog: four click tools and four automation machines.
    pub fn standard() -> Result<Self, CatalogError> {
        use UpgradeCategory::{Auto, Click};
        Self::new(vec![
            UpgradeConfig::new("comet_chisel", "Comet Chisel", Click, 10.0, 1.0, 1.15)
                .with_description("Chip extra dust off every tap.")
                .with_icon("⛏"),
            UpgradeConfig::new("gravity_gauntlet", "Gravity Gauntlet", Click, 100.0, 5.0, 1.15)
                .with_description("Each tap pulls in nearby debris.")
                .with_icon("✊"),
            UpgradeConfig::new("quasar_lance", "Quasar Lance", Click, 1_200.0, 30.0, 1.15)
                .with_description("Focused beams split the crust.")
                .with_icon("⚡"),
            UpgradeConfig::new(
                "singularity_hammer",
                "Singularity Hammer",
                Click,
                15_000.0,
                150.0,
                1.15,
            )
                .with_description("Strike with the weight of a black hole.")
                .with_icon("⚒"),
            UpgradeConfig::new("dust_probe", "Dust Probe", Auto, 15.0, 1.0, 1.15)
                .with_description("A tiny drone that sweeps the orbit.")
                .with_icon("◈"),
            UpgradeConfig::new("orbital_collector", "Orbital Collector", Auto, 150.0, 8.0, 1.15)
                .with_description("Nets stardust from the upper atmosphere.")
                .with_icon("◎"),
            UpgradeConfig::new("dyson_swarm", "Dyson Swarm", Auto, 2_000.0, 50.0, 1.15)
                .with_description("Harvests a star's output around the clock.")
                .with_icon("☀"),
            UpgradeConfig::new("nebula_refinery", "Nebula Refinery", Auto, 25_000.0, 260.0, 1.15)
                .with_description("Condenses whole nebulae into dust.")
                .with_icon("✺"),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&UpgradeConfig> {
        self.entries.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpgradeConfig> {
        self.entries.iter()
    }

    /// Entries of one category, in display order.
    pub fn by_category(&self, category: UpgradeCategory) -> impl Iterator<Item = &UpgradeConfig> {
        self.entries.iter().filter(move |u| u.category == category)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
