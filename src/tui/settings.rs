use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use crate::map::session::SiblingSlot;
use crate::parser::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    None,
    Changed,
    Close,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPanelState {
    pub selected_row: usize,
}

const SETTINGS_ROW_COUNT: usize = 6;
const LIGHTEN_STEP_DELTA: f32 = 0.05;
const VERTICAL_SPACING_DELTA: f64 = 10.0;
const HORIZONTAL_SPACING_DELTA: f64 = 25.0;

pub fn handle_key(
    key: KeyEvent,
    state: &mut SettingsPanelState,
    config: &mut Config,
) -> SettingsEvent {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => SettingsEvent::Close,
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected_row = state.selected_row.saturating_sub(1);
            SettingsEvent::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.selected_row = (state.selected_row + 1).min(SETTINGS_ROW_COUNT - 1);
            SettingsEvent::None
        }
        KeyCode::Left | KeyCode::Char('h') => adjust(config, state.selected_row, false),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => {
            adjust(config, state.selected_row, true)
        }
        _ => SettingsEvent::None,
    }
}

pub fn draw(frame: &mut Frame, state: &SettingsPanelState, config: &Config, persisted: bool) {
    let area = centered_rect(frame.area(), 60, 56);
    frame.render_widget(Clear, area);

    let title = Line::from(vec![
        Span::styled(
            "Setup",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("[Esc] close", Style::default().fg(Color::Gray)),
    ]);

    let selected_row = state.selected_row.min(SETTINGS_ROW_COUNT - 1);
    let mut lines: Vec<Line> = row_values(config)
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| settings_row(selected_row == i, key, value))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "About this option",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
    ]);
    for text in selected_row_description(selected_row) {
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
    }
    let footer = if persisted {
        "Changes write to config immediately."
    } else {
        "Demo mode: changes last until you quit."
    };
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Use arrows/hjkl to adjust, Enter/Space to toggle.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(footer, Style::default().fg(Color::DarkGray))),
    ]);

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, area);
}

fn row_values(config: &Config) -> [(&'static str, String); SETTINGS_ROW_COUNT] {
    [
        ("new sibling slot", config.sibling_slot.as_str().to_string()),
        ("open in view", config.default_view.as_str().to_string()),
        (
            "show connections",
            if config.show_manual_edges { "on" } else { "off" }.to_string(),
        ),
        ("depth lightening", format!("{:.2}", config.depth_lighten_step)),
        ("sibling spacing", format!("{:.0}", config.vertical_spacing)),
        ("level spacing", format!("{:.0}", config.horizontal_spacing)),
    ]
}

fn settings_row(selected: bool, key: &str, value: String) -> Line<'static> {
    let indicator = if selected { ">" } else { " " };
    let base_style = if selected {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut value_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    if selected {
        value_style = value_style.bg(Color::DarkGray);
    }

    Line::from(vec![
        Span::styled(format!("{indicator} {key:<22}"), base_style),
        Span::styled(format!("[{value}]"), value_style),
    ])
}

fn selected_row_description(selected_row: usize) -> [&'static str; 2] {
    match selected_row {
        0 => [
            "next-free: a new sibling goes after the last child.",
            "increment: it takes the next number, if that is free.",
        ],
        1 => [
            "Which view `mindtree view` opens with. Press v in",
            "the editor to switch at any time.",
        ],
        2 => [
            "Draw hand-made connections (c) as dotted lines in",
            "the diagram. They never affect the layout.",
        ],
        3 => [
            "How much each level below a branch head fades",
            "toward white. 0 keeps one color per branch.",
        ],
        4 => [
            "Vertical distance between neighbouring topics",
            "in the diagram.",
        ],
        5 => [
            "Horizontal distance between a topic and its",
            "children in the diagram.",
        ],
        _ => ["", ""],
    }
}

fn adjust(config: &mut Config, selected_row: usize, forward: bool) -> SettingsEvent {
    let sign = if forward { 1.0 } else { -1.0 };
    match selected_row {
        0 => {
            config.sibling_slot = match config.sibling_slot {
                SiblingSlot::NextFree => SiblingSlot::Increment,
                SiblingSlot::Increment => SiblingSlot::NextFree,
            };
            SettingsEvent::Changed
        }
        1 => {
            config.default_view = config.default_view.toggle();
            SettingsEvent::Changed
        }
        2 => {
            config.show_manual_edges = !config.show_manual_edges;
            SettingsEvent::Changed
        }
        3 => {
            let next = config.depth_lighten_step + sign as f32 * LIGHTEN_STEP_DELTA;
            // snap to the 0.05 grid
            config.depth_lighten_step = ((next * 20.0).round() / 20.0).clamp(0.0, 1.0);
            SettingsEvent::Changed
        }
        4 => {
            config.vertical_spacing = (config.vertical_spacing + sign * VERTICAL_SPACING_DELTA)
                .max(VERTICAL_SPACING_DELTA);
            SettingsEvent::Changed
        }
        5 => {
            config.horizontal_spacing = (config.horizontal_spacing
                + sign * HORIZONTAL_SPACING_DELTA)
                .max(HORIZONTAL_SPACING_DELTA);
            SettingsEvent::Changed
        }
        _ => SettingsEvent::None,
    }
}

pub fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}
