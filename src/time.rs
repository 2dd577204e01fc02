//! Fixed-rate periodic tasks driven by an injected clock.
//!
//! `draw_web()` calls at ~60fps with variable delta. A `PeriodicTask` turns
//! those timestamps into a whole number of firings of a fixed period, so
//! game logic stays deterministic and tests can feed synthetic times instead
//! of sleeping.

/// A periodic task using an accumulator.
///
/// The task can be started and stopped. While stopped it ignores time
/// entirely: no firings, and whatever was accumulated is discarded, so a
/// restart begins a fresh period instead of firing immediately.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    /// Milliseconds per firing (e.g. 100ms = 10 Hz)
    period_ms: f64,
    /// Upper bound on the delta accepted from a single `advance` call.
    max_delta_ms: f64,
    /// Accumulated milliseconds not yet consumed as firings
    accumulator: f64,
    /// Timestamp of the last advance (ms), None while stopped
    last_timestamp: Option<f64>,
    /// Total firings since creation
    pub total_firings: u64,
}

impl PeriodicTask {
    /// Create a stopped task.
    ///
    /// `max_delta_ms` caps how much time one `advance` can account for; a gap
    /// longer than that (backgrounded tab, debugger pause) is clamped rather
    /// than replayed in a burst.
    pub fn new(period_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            max_delta_ms: max_delta_ms.max(0.0),
            accumulator: 0.0,
            last_timestamp: None,
            total_firings: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.last_timestamp.is_some()
    }

    /// Start the task at `now_ms`. No-op if already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.last_timestamp.is_none() {
            self.accumulator = 0.0;
            self.last_timestamp = Some(now_ms);
        }
    }

    /// Stop the task and drop any partial period.
    pub fn stop(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or a test clock).
    /// Returns the number of firings due since the previous call.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(prev) = self.last_timestamp else {
            return 0;
        };
        // Clamp to avoid spiral-of-death if tab was backgrounded
        let delta = (now_ms - prev).clamp(0.0, self.max_delta_ms);
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let firings = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= firings as f64 * self.period_ms;
        self.total_firings += firings as u64;
        firings
    }
}
