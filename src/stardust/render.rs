//! Stardust rendering: stats header, the planet with floating gains, the two
//! upgrade panels and the lifetime footer.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::catalog::UpgradeCategory;
use super::engine::UpgradeRow;
use super::logic::{format_number, group_thousands};
use super::save::SaveStore;
use super::{StardustGame, MACHINE_KEYS, TOOL_KEYS};

const PLANET_ART: &[&str] = &[
    "     .-~~~~~-.     ",
    "   .'  o   .  '.   ",
    "  /  .    ___   \\  ",
    " |   __  (___) . | ",
    "  \\ (__)   .    /  ",
    "   '.  .   o  .'   ",
    "     '-.___.-'     ",
];

/// Squashed planet shown while the click pulse is active.
const PLANET_PRESSED_ART: &[&str] = &[
    "                   ",
    "      .-~~~~-.     ",
    "    .' o  . '.     ",
    "   |  __ (__) |    ",
    "    '. . o  .'     ",
    "      '-.__.-'     ",
    "                   ",
];

/// Rows a gain text rises over its lifetime.
const FLOAT_ROWS: f64 = 3.0;

/// Most floating gains drawn per frame; older live ones are skipped.
const MAX_DRAWN_FEEDBACK: usize = 32;

const HEADER_HEIGHT: u16 = 4;
const FOOTER_HEIGHT: u16 = 6;
/// Art + blank + label + borders.
const PLANET_HEIGHT: u16 = 11;
/// Compact panel: summary + four rows + borders.
const COMPACT_PANEL_HEIGHT: u16 = 7;

pub fn render<S: SaveStore>(
    game: &StardustGame<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    now_ms: f64,
    wall_ms: f64,
) {
    let narrow = is_narrow_layout(area.width);

    let (header, planet, tools, machines, footer) = if narrow {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(PLANET_HEIGHT),
                Constraint::Length(COMPACT_PANEL_HEIGHT),
                Constraint::Length(COMPACT_PANEL_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);
        (chunks[0], chunks[1], chunks[2], chunks[3], chunks[4])
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(PLANET_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        (left[0], left[1], right[0], right[1], left[2])
    };

    render_header(game, f, header);
    render_planet(game, f, planet, click_state, now_ms);
    render_feedback(game, f, planet, now_ms);
    render_upgrades(game, f, tools, click_state, UpgradeCategory::Click, narrow);
    render_upgrades(game, f, machines, click_state, UpgradeCategory::Auto, narrow);
    render_footer(game, f, footer, click_state, wall_ms);
}

fn render_header<S: SaveStore>(game: &StardustGame<S>, f: &mut Frame, area: Rect) {
    let engine = &game.engine;
    let lines = vec![
        Line::from(Span::styled(
            format!("✦ {} stardust", format_number(engine.stardust())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("⚡ {}/sec", format_number(engine.auto_power())),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   "),
            Span::styled(
                format!("✧ +{}/click", format_number(engine.click_power())),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" ✦ Cosmic Stardust "),
    );
    f.render_widget(widget, area);
}

/// The planet button. The whole panel is the click target.
fn render_planet<S: SaveStore>(
    game: &StardustGame<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    now_ms: f64,
) {
    let pressed = game.engine.is_pressed(now_ms);
    let (art, art_color, border_color) = if pressed {
        (PLANET_PRESSED_ART, Color::White, Color::White)
    } else {
        (PLANET_ART, Color::LightMagenta, Color::Magenta)
    };
    let label_style = if pressed {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    };
    let label = format!("[C] Harvest +{}", format_number(game.engine.click_power()));

    let content_rows = art.len() as u16 + 2;
    let top_pad = area.height.saturating_sub(2 + content_rows) / 2;

    let mut lines: Vec<Line> = Vec::new();
    for _ in 0..top_pad {
        lines.push(Line::from(""));
    }
    for row in art {
        lines.push(Line::from(Span::styled(*row, Style::default().fg(art_color))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(label, label_style)));

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Planet "),
    );
    f.render_widget(widget, area);

    click_state.borrow_mut().add_click_target(area, CLICK_PLANET);
}

/// Floating "+N" texts. Each rises from where it was created and fades
/// toward the end of its lifetime; anything outside `area` is clipped.
fn render_feedback<S: SaveStore>(game: &StardustGame<S>, f: &mut Frame, area: Rect, now_ms: f64) {
    let right = area.x + area.width;
    let bottom = area.y + area.height;
    let live = game.engine.feedback().count();
    for event in game.engine.feedback().skip(live.saturating_sub(MAX_DRAWN_FEEDBACK)) {
        let progress = event.progress(now_ms);
        let y = event.y.saturating_sub((progress * FLOAT_ROWS) as u16);
        let x = event.x;
        if x < area.x || x >= right || y < area.y || y >= bottom {
            continue;
        }
        let color = if progress < 0.33 {
            Color::White
        } else if progress < 0.66 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let text = format!("+{}", event.text);
        let width = (text.chars().count() as u16).min(right - x);
        let widget = Paragraph::new(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(widget, Rect::new(x, y, width, 1));
    }
}

/// One category's upgrades. Rows are clickable purchase buttons; wide
/// layouts add a description row under each, bound to the same purchase.
fn render_upgrades<S: SaveStore>(
    game: &StardustGame<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    category: UpgradeCategory,
    compact: bool,
) {
    let engine = &game.engine;
    let (action_base, keys, summary, border_color) = match category {
        UpgradeCategory::Click => (
            BUY_TOOL_BASE,
            &TOOL_KEYS,
            format!("+{} per click", format_number(engine.click_power())),
            Color::Magenta,
        ),
        UpgradeCategory::Auto => (
            BUY_MACHINE_BASE,
            &MACHINE_KEYS,
            format!("{} per second", format_number(engine.auto_power())),
            Color::Cyan,
        ),
    };

    let rows: Vec<UpgradeRow> = engine
        .upgrade_rows()
        .into_iter()
        .filter(|r| r.config.category == category)
        .collect();

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(summary, Style::default().fg(Color::DarkGray))));

    for (i, row) in rows.iter().enumerate() {
        let key = keys
            .get(i)
            .map(|k| format!("[{}]", k.to_ascii_uppercase()))
            .unwrap_or_else(|| "   ".to_string());
        let (key_style, text_style, cost_style) = if row.affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
                Style::default().fg(Color::Green),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        let owned_style = if row.owned > 0 {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let action = action_base + i as u16;
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!("{} ", key), key_style),
                Span::styled(format!("{} {:<18}", row.config.icon, row.config.name), text_style),
                Span::styled(format!(" x{:<3}", row.owned), owned_style),
                Span::styled(format!(" ✦{}", format_number(row.next_cost)), cost_style),
            ]),
            action,
        );
        if !compact {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("      {}", row.config.description),
                    Style::default().fg(Color::DarkGray),
                )),
                action,
            );
        }
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1);
    }

    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", category.title())),
    );
    f.render_widget(widget, area);
}

fn render_footer<S: SaveStore>(
    game: &StardustGame<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    wall_ms: f64,
) {
    let engine = &game.engine;
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled("Lifetime Harvest: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_number(engine.lifetime_stardust()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("   Clicks: {}", group_thousands(engine.click_count())),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    if game.confirm_reset {
        cl.push(Line::from(Span::styled(
            "Wipe all progress? This cannot be undone.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        let yes = Style::default().fg(Color::Red);
        let no = Style::default().fg(Color::Green);
        cl.push_clickable(Line::from(Span::styled(" [Y] Yes, reset", yes)), RESET_CONFIRM);
        cl.push_clickable(Line::from(Span::styled(" [N] Keep playing", no)), RESET_CANCEL);
    } else {
        cl.push(Line::from(Span::styled(
            format!("Playing for {}", format_duration(engine.elapsed_play_ms(wall_ms))),
            Style::default().fg(Color::DarkGray),
        )));
        cl.push(Line::from(""));
        let hint = Style::default().fg(Color::DarkGray);
        cl.push_clickable(Line::from(Span::styled(" [R] Reset progress", hint)), RESET_REQUEST);
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1);
    }

    let border_color = if game.confirm_reset { Color::Red } else { Color::DarkGray };
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(widget, area);
}

/// `42s`, `3m 05s`, `1h 02m`.
fn format_duration(ms: f64) -> String {
    let secs = (ms / 1000.0).max(0.0) as u64;
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}
