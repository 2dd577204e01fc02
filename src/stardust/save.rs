//! Stardust save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current save format version. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest version that can still be loaded.
//!   Only bump it for breaking changes (a field changing meaning or being
//!   removed); added fields get defaults when an older save is read.
//!
//! Records written before the version envelope existed (a bare game object)
//! are still accepted and treated as version 0 data with the same fields.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::console;

use super::state::GameState;

/// Current save format version.
const SAVE_VERSION: u32 = 1;

/// Oldest save version that can still be loaded.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Key of the single persisted record.
pub const STORAGE_KEY: &str = "cosmicClickerSave";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("failed to parse save data: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize save data: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("save version {saved} is older than the minimum supported {min}")]
    IncompatibleVersion { saved: u32, min: u32 },
}

/// Durable string key-value storage.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// In-memory storage for native builds and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The browser's `localStorage`. WASM only.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or_else(|| SaveError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SaveError::Storage("localStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// Versioned envelope around the game record.
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

/// Serialized form of `GameState`. Field names match the original
/// `cosmicClickerSave` JSON so old browser saves still load.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GameSave {
    stardust: f64,
    lifetime_stardust: f64,
    #[serde(default)]
    click_count: u64,
    /// Owned counts by id. Ids unknown to the current catalog are kept.
    #[serde(default)]
    upgrades: BTreeMap<String, u32>,
    #[serde(default)]
    start_time: f64,
}

/// Either the current envelope or a bare pre-envelope record.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveRecord {
    Versioned(SaveData),
    Legacy(GameSave),
}

/// What `load_state` found in storage.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing saved yet.
    Fresh,
    Restored,
    /// The record was unusable; a fresh game was started instead.
    Recovered(SaveError),
}

fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            stardust: state.stardust,
            lifetime_stardust: state.lifetime_stardust,
            click_count: state.click_count,
            upgrades: state.upgrades.clone(),
            start_time: state.start_time,
        },
    }
}

/// Rebuild a state from a record, clamping values a valid game can never
/// hold. `now_ms` stands in for a missing start time.
fn apply_save(save: GameSave, now_ms: f64) -> GameState {
    let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let start_time = if save.start_time.is_finite() && save.start_time > 0.0 {
        save.start_time
    } else {
        now_ms
    };
    GameState {
        stardust: sane(save.stardust),
        lifetime_stardust: sane(save.lifetime_stardust),
        click_count: save.click_count,
        upgrades: save.upgrades,
        start_time,
    }
}

/// Serialize `state` to the JSON record.
pub fn to_json(state: &GameState) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state)).map_err(SaveError::Serialize)
}

/// Parse a JSON record into a state.
pub fn from_json(json: &str, now_ms: f64) -> Result<GameState, SaveError> {
    let record: SaveRecord = serde_json::from_str(json).map_err(SaveError::Parse)?;
    let game = match record {
        SaveRecord::Versioned(data) => {
            if data.version < MIN_COMPATIBLE_VERSION {
                return Err(SaveError::IncompatibleVersion {
                    saved: data.version,
                    min: MIN_COMPATIBLE_VERSION,
                });
            }
            if data.version != SAVE_VERSION {
                console::info(&format!(
                    "loading save version {} with format version {}",
                    data.version, SAVE_VERSION
                ));
            }
            data.game
        }
        SaveRecord::Legacy(game) => {
            console::info("migrating unversioned save");
            game
        }
    };
    Ok(apply_save(game, now_ms))
}

/// Write `state` under `key`. Failures are logged and returned; callers are
/// free to ignore them.
pub fn save_state<S: SaveStore>(
    store: &mut S,
    key: &str,
    state: &GameState,
) -> Result<(), SaveError> {
    let result = to_json(state).and_then(|json| store.write(key, &json));
    if let Err(e) = &result {
        console::warn(&format!("save failed: {e}"));
    }
    result
}

/// Restore the state saved under `key`, or start fresh at `now_ms`.
///
/// Never fails: a missing record gives `Fresh`, a broken one is logged,
/// deleted, and reported as `Recovered`.
pub fn load_state<S: SaveStore>(
    store: &mut S,
    key: &str,
    now_ms: f64,
) -> (GameState, LoadOutcome) {
    let json = match store.read(key) {
        Ok(Some(json)) => json,
        Ok(None) => return (GameState::new(now_ms), LoadOutcome::Fresh),
        Err(e) => {
            console::warn(&format!("could not read save: {e}"));
            return (GameState::new(now_ms), LoadOutcome::Recovered(e));
        }
    };

    match from_json(&json, now_ms) {
        Ok(state) => (state, LoadOutcome::Restored),
        Err(e) => {
            console::warn(&format!("discarding unusable save: {e}"));
            let _ = clear_save(store, key);
            (GameState::new(now_ms), LoadOutcome::Recovered(e))
        }
    }
}

/// Delete the record under `key`.
pub fn clear_save<S: SaveStore>(store: &mut S, key: &str) -> Result<(), SaveError> {
    let result = store.remove(key);
    if let Err(e) = &result {
        console::warn(&format!("could not clear save: {e}"));
    }
    result
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = GameState> {
        (
            0.0f64..1e15,
            0.0f64..1e15,
            0u64..1_000_000,
            prop::collection::btree_map("[a-z_]{1,12}", 0u32..500, 0..8),
            1.0f64..2e12,
        )
            .prop_map(|(stardust, extra, click_count, upgrades, start_time)| GameState {
                stardust,
                lifetime_stardust: stardust + extra,
                click_count,
                upgrades,
                start_time,
            })
    }

    proptest! {
        #[test]
        fn prop_load_of_save_is_identity(state in arb_state()) {
            let json = to_json(&state).unwrap();
            let restored = from_json(&json, 0.0).unwrap();
            prop_assert_eq!(restored, state);
        }
    }
}
