mod console;
mod input;
mod stardust;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use stardust::actions::CLICK_PLANET;
use stardust::catalog::Catalog;
use stardust::engine::{Engine, EngineConfig};
use stardust::save::LoadOutcome;
use stardust::StardustGame;

#[cfg(target_arch = "wasm32")]
type Store = stardust::save::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
type Store = stardust::save::MemoryStore;

/// Monotonic frame clock in milliseconds.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Unix epoch milliseconds. Only used for the game's start time.
fn wall_ms() -> f64 {
    js_sys::Date::now()
}

/// Query the grid container's bounding rect and convert pixel coordinates
/// to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let catalog =
        Catalog::standard().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let (engine, outcome) = Engine::load(
        catalog,
        Store::default(),
        EngineConfig::default(),
        now_ms(),
        wall_ms(),
    );
    match outcome {
        LoadOutcome::Fresh => console::info("starting a new game"),
        LoadOutcome::Restored => console::info("save restored"),
        LoadOutcome::Recovered(_) => console::info("started over after an unreadable save"),
    }

    let game = Rc::new(RefCell::new(StardustGame::new(engine)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let event = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                    return;
                };
                let Some(action_id) = cs.hit_test(col, row) else {
                    return;
                };
                InputEvent::Click { action_id, col, row }
            };
            game.borrow_mut()
                .handle_input(&event, (0, 0), now_ms(), wall_ms());
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |key_event| {
            let c = match key_event.code {
                KeyCode::Char(c) => c.to_ascii_lowercase(),
                KeyCode::Esc => 'n',
                _ => return,
            };
            let planet_center = click_state
                .borrow()
                .target_center(CLICK_PLANET)
                .unwrap_or((0, 0));
            game.borrow_mut()
                .handle_input(&InputEvent::Key(c), planet_center, now_ms(), wall_ms());
        }
    });

    terminal.draw_web(move |f| {
        let now = now_ms();
        game.borrow_mut().tick(now);

        let size = f.area();
        {
            let mut cs = click_state.borrow_mut();
            cs.terminal_cols = size.width;
            cs.terminal_rows = size.height;
            cs.clear_targets();
        }
        game.borrow().render(f, size, &click_state, now, wall_ms());
    });

    Ok(())
}
