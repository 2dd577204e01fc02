//! Semantic action IDs for Stardust click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_PLANET: u16 = 0;

// ── Purchases (base + index within the category) ────────────────
pub const BUY_TOOL_BASE: u16 = 100;
pub const BUY_MACHINE_BASE: u16 = 200;

/// Slots per category. The keyboard reaches the first four.
pub const CATEGORY_SLOTS: u16 = 100;

// ── Reset flow ──────────────────────────────────────────────────
pub const RESET_REQUEST: u16 = 500;
pub const RESET_CONFIRM: u16 = 501;
pub const RESET_CANCEL: u16 = 502;
