//! Browser console logging.
//!
//! On wasm32 these forward to `console.log` / `console.warn`. Native builds
//! (unit tests) have no console to talk to, so messages are dropped.

/// Informational message, e.g. a save migration.
pub fn info(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("Stardust: {msg}").into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Recoverable problem, e.g. a corrupt save that was discarded.
pub fn warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("Stardust: {msg}").into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}
