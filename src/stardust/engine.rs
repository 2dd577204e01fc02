//! Game session: owns the state and wires commands, periodic tasks and
//! derived values together.
//!
//! The host calls [`Engine::advance`] with a monotonic timestamp on every
//! frame. Two independent [`PeriodicTask`]s turn that into auto-production
//! firings (10 Hz, only while auto power > 0) and autosaves (every 5 s).

use crate::time::PeriodicTask;

use super::catalog::{Catalog, UpgradeConfig};
use super::economy;
use super::feedback::{ClickPulse, FeedbackEvent, FeedbackQueue};
use super::logic;
use super::save::{self, LoadOutcome, SaveStore, STORAGE_KEY};
use super::state::{GameState, PurchaseOutcome};

/// Tunable timings and limits.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Auto-production period. Each firing credits `auto_power * period`.
    pub auto_tick_ms: f64,
    pub autosave_ms: f64,
    pub feedback_ttl_ms: f64,
    /// How long the planet stays visually pressed after a click.
    pub press_dwell_ms: f64,
    /// Longest frame gap the periodic tasks will catch up on.
    pub max_catch_up_ms: f64,
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_tick_ms: 100.0,
            autosave_ms: 5_000.0,
            feedback_ttl_ms: 1_000.0,
            press_dwell_ms: 100.0,
            max_catch_up_ms: 500.0,
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

/// One catalog entry as the upgrade panels need it.
#[derive(Debug, Clone)]
pub struct UpgradeRow<'a> {
    pub config: &'a UpgradeConfig,
    pub owned: u32,
    pub next_cost: f64,
    pub affordable: bool,
}

/// What a call to [`Engine::advance`] did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    pub auto_firings: u32,
    pub feedback_expired: usize,
    pub saved: bool,
}

pub struct Engine<S: SaveStore> {
    catalog: Catalog,
    state: GameState,
    feedback: FeedbackQueue,
    pulse: ClickPulse,
    auto_task: PeriodicTask,
    autosave_task: PeriodicTask,
    store: S,
    config: EngineConfig,
    /// Cached so re-syncing the auto task doesn't walk the catalog each frame.
    auto_power: f64,
}

impl<S: SaveStore> Engine<S> {
    /// Load the saved game (or start fresh) and start the periodic tasks.
    ///
    /// `now_ms` is the monotonic frame clock; `wall_ms` is Unix epoch time,
    /// used only as the start time of a new game.
    pub fn load(
        catalog: Catalog,
        mut store: S,
        config: EngineConfig,
        now_ms: f64,
        wall_ms: f64,
    ) -> (Self, LoadOutcome) {
        let (state, outcome) = save::load_state(&mut store, &config.storage_key, wall_ms);
        let mut autosave_task = PeriodicTask::new(config.autosave_ms, config.autosave_ms);
        autosave_task.start(now_ms);
        let mut engine = Self {
            feedback: FeedbackQueue::new(config.feedback_ttl_ms),
            pulse: ClickPulse::default(),
            auto_task: PeriodicTask::new(config.auto_tick_ms, config.max_catch_up_ms),
            autosave_task,
            catalog,
            state,
            store,
            config,
            auto_power: 0.0,
        };
        engine.sync_auto_task(now_ms);
        (engine, outcome)
    }

    // ── Commands ──────────────────────────────────────────────

    /// Manual click at terminal cell `(x, y)`. Returns the stardust gained.
    pub fn click(&mut self, x: u16, y: u16, now_ms: f64) -> f64 {
        let power = self.click_power();
        logic::apply_click(&mut self.state, power);
        self.feedback.enqueue(x, y, logic::format_number(power), now_ms);
        self.pulse.press(now_ms, self.config.press_dwell_ms);
        power
    }

    /// Buy one unit of `id` at its current price.
    pub fn purchase(&mut self, id: &str, now_ms: f64) -> PurchaseOutcome {
        let outcome = logic::purchase_upgrade(&mut self.state, &self.catalog, id);
        self.after_purchase(&outcome, now_ms);
        outcome
    }

    fn after_purchase(&mut self, outcome: &PurchaseOutcome, now_ms: f64) {
        if outcome.is_purchased() {
            self.sync_auto_task(now_ms);
            self.save_now();
        }
    }

    /// Wipe all progress: fresh state, no saved record, no pending feedback.
    pub fn reset(&mut self, now_ms: f64, wall_ms: f64) {
        logic::reset(&mut self.state, wall_ms);
        self.feedback.clear();
        self.pulse.reset();
        let _ = save::clear_save(&mut self.store, &self.config.storage_key);
        self.sync_auto_task(now_ms);
        // Restart the autosave period so it doesn't immediately re-create the record.
        self.autosave_task.stop();
        self.autosave_task.start(now_ms);
    }

    /// Drive all periodic work up to `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> TickReport {
        let mut report = TickReport::default();

        let firings = self.auto_task.advance(now_ms);
        let slice_secs = self.config.auto_tick_ms / 1000.0;
        for _ in 0..firings {
            logic::apply_auto_tick(&mut self.state, self.auto_power, slice_secs);
        }
        report.auto_firings = firings;

        report.feedback_expired = self.feedback.sweep(now_ms);
        self.pulse.update(now_ms);

        if self.autosave_task.advance(now_ms) > 0 {
            report.saved = self.save_now();
        }
        report
    }

    /// Persist immediately. Returns whether the write succeeded; failures are
    /// already logged.
    pub fn save_now(&mut self) -> bool {
        save::save_state(&mut self.store, &self.config.storage_key, &self.state).is_ok()
    }

    /// Start the auto-production task when there is something to produce and
    /// stop it when there isn't.
    fn sync_auto_task(&mut self, now_ms: f64) {
        self.auto_power = economy::auto_power(&self.state.upgrades, &self.catalog);
        if self.auto_power > 0.0 {
            self.auto_task.start(now_ms);
        } else {
            self.auto_task.stop();
        }
    }

    // ── Derived values ────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stardust(&self) -> f64 {
        self.state.stardust
    }

    pub fn lifetime_stardust(&self) -> f64 {
        self.state.lifetime_stardust
    }

    pub fn click_count(&self) -> u64 {
        self.state.click_count
    }

    pub fn click_power(&self) -> f64 {
        economy::click_power(&self.state.upgrades, &self.catalog)
    }

    /// Stardust per second.
    pub fn auto_power(&self) -> f64 {
        self.auto_power
    }

    pub fn is_auto_running(&self) -> bool {
        self.auto_task.is_running()
    }

    /// Every catalog entry in display order with its owned count and price.
    pub fn upgrade_rows(&self) -> Vec<UpgradeRow<'_>> {
        self.catalog
            .iter()
            .map(|config| {
                let next_cost = economy::next_cost(config, &self.state.upgrades);
                UpgradeRow {
                    config,
                    owned: self.state.owned(&config.id),
                    next_cost,
                    affordable: economy::can_afford(self.state.stardust, next_cost),
                }
            })
            .collect()
    }

    pub fn feedback(&self) -> impl Iterator<Item = &FeedbackEvent> {
        self.feedback.events()
    }

    pub fn is_pressed(&self, now_ms: f64) -> bool {
        self.pulse.is_pressed(now_ms)
    }

    /// Milliseconds since the game was started, by the wall clock.
    pub fn elapsed_play_ms(&self, wall_ms: f64) -> f64 {
        (wall_ms - self.state.start_time).max(0.0)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
