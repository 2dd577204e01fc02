//! Stardust: a cosmic idle clicker.

pub mod actions;
pub mod catalog;
pub mod economy;
pub mod engine;
pub mod feedback;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::console;
use crate::input::{ClickState, InputEvent};

use actions::*;
use catalog::UpgradeCategory;
use engine::{Engine, TickReport};
use save::SaveStore;

/// Keys bound to the first tools and machines, in catalog order.
pub const TOOL_KEYS: [char; 4] = ['1', '2', '3', '4'];
pub const MACHINE_KEYS: [char; 4] = ['a', 's', 'd', 'f'];

pub struct StardustGame<S: SaveStore> {
    pub engine: Engine<S>,
    /// A reset was requested and waits for `y`.
    pub confirm_reset: bool,
}

impl<S: SaveStore> StardustGame<S> {
    pub fn new(engine: Engine<S>) -> Self {
        Self {
            engine,
            confirm_reset: false,
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    ///
    /// `planet_center` is where a keyboard harvest lands, so its "+N" floats
    /// up from the planet like a tap would.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        planet_center: (u16, u16),
        now_ms: f64,
        wall_ms: f64,
    ) -> bool {
        match event {
            InputEvent::Key(c) => match key_action(*c) {
                Some(action) => {
                    let (col, row) = planet_center;
                    self.dispatch(action, col, row, now_ms, wall_ms)
                }
                None if self.confirm_reset => {
                    self.confirm_reset = false;
                    true
                }
                None => false,
            },
            InputEvent::Click { action_id, col, row } => {
                self.dispatch(*action_id, *col, *row, now_ms, wall_ms)
            }
        }
    }

    fn dispatch(&mut self, action: u16, col: u16, row: u16, now_ms: f64, wall_ms: f64) -> bool {
        // While confirming, anything but an explicit yes cancels.
        if self.confirm_reset {
            self.confirm_reset = false;
            if action == RESET_CONFIRM {
                self.engine.reset(now_ms, wall_ms);
                console::info("progress reset");
            }
            return true;
        }
        match action {
            CLICK_PLANET => {
                self.engine.click(col, row, now_ms);
                true
            }
            RESET_REQUEST => {
                self.confirm_reset = true;
                true
            }
            a if (BUY_TOOL_BASE..BUY_TOOL_BASE + CATEGORY_SLOTS).contains(&a) => {
                self.buy(UpgradeCategory::Click, (a - BUY_TOOL_BASE) as usize, now_ms)
            }
            a if (BUY_MACHINE_BASE..BUY_MACHINE_BASE + CATEGORY_SLOTS).contains(&a) => {
                self.buy(UpgradeCategory::Auto, (a - BUY_MACHINE_BASE) as usize, now_ms)
            }
            _ => false,
        }
    }

    /// Buy the `index`-th upgrade of `category`. Returns false when there is
    /// no such slot; an unaffordable purchase still consumes the input.
    fn buy(&mut self, category: UpgradeCategory, index: usize, now_ms: f64) -> bool {
        let Some(id) = self
            .engine
            .catalog()
            .by_category(category)
            .nth(index)
            .map(|u| u.id.clone())
        else {
            return false;
        };
        self.engine.purchase(&id, now_ms);
        true
    }

    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.engine.advance(now_ms)
    }

    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        click_state: &Rc<RefCell<ClickState>>,
        now_ms: f64,
        wall_ms: f64,
    ) {
        render::render(self, f, area, click_state, now_ms, wall_ms);
    }
}

/// Map a key to the action its on-screen button triggers.
fn key_action(c: char) -> Option<u16> {
    if let Some(i) = TOOL_KEYS.iter().position(|&k| k == c) {
        return Some(BUY_TOOL_BASE + i as u16);
    }
    if let Some(i) = MACHINE_KEYS.iter().position(|&k| k == c) {
        return Some(BUY_MACHINE_BASE + i as u16);
    }
    match c {
        'c' | ' ' => Some(CLICK_PLANET),
        'r' => Some(RESET_REQUEST),
        'y' => Some(RESET_CONFIRM),
        'n' => Some(RESET_CANCEL),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stardust::catalog::Catalog;
    use crate::stardust::engine::EngineConfig;
    use crate::stardust::save::{MemoryStore, STORAGE_KEY};

    const WALL: f64 = 1_700_000_000_000.0;

    fn game() -> StardustGame<MemoryStore> {
        let (engine, _) = Engine::load(
            Catalog::standard().unwrap(),
            MemoryStore::new(),
            EngineConfig::default(),
            0.0,
            WALL,
        );
        StardustGame::new(engine)
    }

    fn key(game: &mut StardustGame<MemoryStore>, c: char) -> bool {
        game.handle_input(&InputEvent::Key(c), (20, 8), 0.0, WALL)
    }

    #[test]
    fn c_harvests_at_planet_center() {
        let mut g = game();
        assert!(key(&mut g, 'c'));
        assert_eq!(g.engine.stardust(), 1.0);
        let event = g.engine.feedback().next().unwrap();
        assert_eq!((event.x, event.y), (20, 8));
    }

    #[test]
    fn tap_harvests_at_tap_position() {
        let mut g = game();
        let tap = InputEvent::Click { action_id: CLICK_PLANET, col: 3, row: 4 };
        assert!(g.handle_input(&tap, (20, 8), 0.0, WALL));
        let event = g.engine.feedback().next().unwrap();
        assert_eq!((event.x, event.y), (3, 4));
    }

    #[test]
    fn number_keys_buy_tools_in_catalog_order() {
        let mut g = game();
        g.engine.state_mut().stardust = 1_000.0;
        key(&mut g, '1');
        key(&mut g, '2');
        assert_eq!(g.engine.state().owned("comet_chisel"), 1);
        assert_eq!(g.engine.state().owned("gravity_gauntlet"), 1);
        assert_eq!(g.engine.click_power(), 7.0);
    }

    #[test]
    fn letter_keys_buy_machines() {
        let mut g = game();
        g.engine.state_mut().stardust = 1_000.0;
        key(&mut g, 'a');
        assert_eq!(g.engine.state().owned("dust_probe"), 1);
        assert!(g.engine.is_auto_running());
    }

    #[test]
    fn buy_click_target_maps_to_machine_slot() {
        let mut g = game();
        g.engine.state_mut().stardust = 1_000.0;
        let tap = InputEvent::Click { action_id: BUY_MACHINE_BASE + 1, col: 0, row: 0 };
        assert!(g.handle_input(&tap, (0, 0), 0.0, WALL));
        assert_eq!(g.engine.state().owned("orbital_collector"), 1);
    }

    #[test]
    fn unaffordable_key_is_consumed_without_change() {
        let mut g = game();
        assert!(key(&mut g, '4'));
        assert_eq!(g.engine.state().owned("singularity_hammer"), 0);
        assert_eq!(g.engine.stardust(), 0.0);
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut g = game();
        let tap = InputEvent::Click { action_id: BUY_TOOL_BASE + 40, col: 0, row: 0 };
        assert!(!g.handle_input(&tap, (0, 0), 0.0, WALL));
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut g = game();
        key(&mut g, ' ');
        key(&mut g, 'r');
        assert!(g.confirm_reset);
        key(&mut g, 'y');
        assert!(!g.confirm_reset);
        assert_eq!(g.engine.stardust(), 0.0);
        assert_eq!(g.engine.click_count(), 0);
        assert_eq!(g.engine.store().read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn any_other_key_cancels_reset() {
        let mut g = game();
        key(&mut g, ' ');
        key(&mut g, 'r');
        assert!(key(&mut g, 'x'));
        assert!(!g.confirm_reset);
        assert_eq!(g.engine.stardust(), 1.0);
        // The cancelling key does nothing else
        key(&mut g, 'r');
        key(&mut g, ' ');
        assert!(!g.confirm_reset);
        assert_eq!(g.engine.stardust(), 1.0);
    }

    #[test]
    fn confirm_without_request_is_ignored() {
        let mut g = game();
        key(&mut g, ' ');
        assert!(!key(&mut g, 'y'));
        assert_eq!(g.engine.stardust(), 1.0);
    }

    #[test]
    fn unbound_key_not_consumed() {
        let mut g = game();
        assert!(!key(&mut g, 'z'));
    }

    #[test]
    fn tick_drives_auto_production() {
        let mut g = game();
        g.engine.state_mut().stardust = 15.0;
        key(&mut g, 'a');
        let report = g.tick(100.0);
        assert_eq!(report.auto_firings, 1);
        assert!((g.engine.stardust() - 0.1).abs() < 1e-9);
    }
}
