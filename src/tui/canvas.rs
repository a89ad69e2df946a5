use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{error, info};

use crate::map::model::{EdgeKind, MapData, Node, clean_label};
use crate::map::session::{DEFAULT_ROOT_LABEL, MindMap};
use crate::parser::config::{Config, ViewMode};
use crate::store::{self, MapRecord};
use crate::tui::input::{self, Action, Direction};
use crate::tui::render::{
    self, CanvasRenderData, ROW_ASPECT, RenderEdge, RenderNode, Viewport, border_marks,
};
use crate::tui::settings::{self, SettingsEvent, SettingsPanelState, centered_rect};

const DEFAULT_SCALE: f64 = 12.0;
const MIN_SCALE: f64 = 3.0;
const MAX_SCALE: f64 = 60.0;
const ZOOM_FACTOR: f64 = 1.25;
/// Columns moved per pan step.
const PAN_STEP: f64 = 8.0;
/// Columns kept between the selection and the edge of the diagram.
const FOLLOW_MARGIN: f64 = 4.0;

/// What `mindtree view` opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// Built-in sample, kept in memory.
    Demo,
    /// A stored map by id or name; `None` picks the most recently updated.
    Stored(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Drawing a manual edge from `connect_source`.
    Connecting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingTextKind {
    AddChild { anchor: String },
    AddSibling { anchor: String },
    Rename { id: String },
}

#[derive(Debug, Clone)]
struct PendingText {
    title: String,
    buffer: String,
    cursor: usize,
    kind: PendingTextKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingConfirm {
    DeleteNode { id: String, label: String, count: usize },
}

#[derive(Debug)]
struct AppState {
    map: MindMap,
    map_name: String,
    /// Store holding the config; `None` in demo mode.
    store_root: Option<PathBuf>,
    /// Whether map changes are written back.
    persist_map: bool,
    config: Config,
    view: ViewMode,
    selected: String,
    connect_source: Option<String>,
    mode: Mode,
    viewport: Viewport,
    content_area: Rect,
    follow_selection: bool,
    pan_mode: bool,
    show_help: bool,
    show_settings: bool,
    settings_state: SettingsPanelState,
    status_message: Option<String>,
    pending_text: Option<PendingText>,
    pending_confirm: Option<PendingConfirm>,
    demo: bool,
}

impl AppState {
    fn load(source: &MapSource, open_settings: bool) -> Result<Self> {
        let key = match source {
            MapSource::Demo => {
                let mut app = Self::demo();
                app.show_settings = open_settings;
                return Ok(app);
            }
            MapSource::Stored(key) => key.as_deref(),
        };

        let root = store::find_root()?;
        let config = store::load_config(&root)?;
        let record = match key {
            Some(key) => Some(store::resolve_map(&root, key)?),
            None => store::list_maps(&root)?.into_iter().next(),
        };

        let Some(mut record) = record else {
            if !open_settings {
                bail!("no maps yet. Create one with `mindtree new <name>`");
            }
            // settings can be edited before any map exists
            let map = MindMap::new(DEFAULT_ROOT_LABEL, config.settings());
            let mut app = Self::with_map(map, "scratch".to_string(), config);
            app.store_root = Some(root);
            app.show_settings = true;
            app.status_message = Some("no stored maps: this scratch map is not saved".into());
            return Ok(app);
        };

        let data = std::mem::take(&mut record.data);
        let name = record.name.clone();
        let (mut map, warnings) = MindMap::open(data, config.settings());
        info!(id = %record.id, nodes = map.nodes().len(), "opened map");

        let save_root = root.clone();
        map.set_listener(move |data: &MapData| {
            let updated = MapRecord {
                data: data.clone(),
                updated_at: store::now_millis(),
                ..record.clone()
            };
            if let Err(err) = store::save_map(&save_root, &updated) {
                error!("failed to save map {}: {err:#}", updated.id);
            }
        });

        let mut app = Self::with_map(map, name, config);
        app.store_root = Some(root);
        app.persist_map = true;
        app.show_settings = open_settings;
        if !warnings.is_empty() {
            app.status_message = Some(format!(
                "repaired {} problem{} on load; see .mindtree/mindtree.log",
                warnings.len(),
                if warnings.len() == 1 { "" } else { "s" }
            ));
        }
        Ok(app)
    }

    fn demo() -> Self {
        let config = Config::default();
        let map = demo_map(&config);
        let mut app = Self::with_map(map, "demo".to_string(), config);
        app.demo = true;
        app.status_message = Some("demo mode: changes are in-memory only".to_string());
        app
    }

    fn with_map(map: MindMap, map_name: String, config: Config) -> Self {
        let selected = map.root().map(|n| n.id.clone()).unwrap_or_default();
        Self {
            map,
            map_name,
            store_root: None,
            persist_map: false,
            view: config.default_view,
            config,
            selected,
            connect_source: None,
            mode: Mode::Normal,
            viewport: Viewport {
                center_x: 0.0,
                center_y: 0.0,
                scale: DEFAULT_SCALE,
            },
            content_area: Rect::default(),
            follow_selection: true,
            pan_mode: false,
            show_help: false,
            show_settings: false,
            settings_state: SettingsPanelState::default(),
            status_message: None,
            pending_text: None,
            pending_confirm: None,
            demo: false,
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        self.content_area = render::content_area(frame.area());
        self.follow();

        let rows = self
            .map
            .outline_rows(true)
            .into_iter()
            .map(|(node, depth)| self.render_node(node, depth))
            .collect::<Vec<_>>();
        let nodes = self
            .map
            .nodes()
            .iter()
            .map(|node| self.render_node(node, node.level))
            .collect::<Vec<_>>();
        let edges = self.render_edges();

        let selected = self.map.node(&self.selected);
        let selected_label = selected.map(|n| n.label.as_str()).unwrap_or("-");
        let selected_path = selected.map(|n| n.path.to_string()).unwrap_or_default();
        let hints = self.hints();

        let data = CanvasRenderData {
            map_name: &self.map_name,
            view: self.view,
            rows: &rows,
            nodes: &nodes,
            edges: &edges,
            viewport: self.viewport,
            selected_label,
            selected_path: &selected_path,
            node_count: self.map.nodes().len(),
            mode_label: self.mode_label(),
            hints: &hints,
            message: self.status_message.as_deref(),
            show_help: self.show_help,
            connect_mode: self.mode == Mode::Connecting,
            demo: self.demo,
        };
        render::draw(frame, &data);

        if self.show_settings {
            settings::draw(
                frame,
                &self.settings_state,
                &self.config,
                self.store_root.is_some(),
            );
        }
        if let Some(prompt) = &self.pending_text {
            draw_text_prompt(frame, prompt);
        } else if let Some(confirm) = &self.pending_confirm {
            draw_confirm_prompt(frame, confirm);
        }
    }

    fn render_node(&self, node: &Node, depth: usize) -> RenderNode {
        RenderNode {
            id: node.id.clone(),
            label: node.label.clone(),
            path: node.path.to_string(),
            depth,
            color: node.branch_color,
            position: node.position,
            style: node.style.clone(),
            is_root: node.is_root,
            has_children: self.map.has_children(&node.id),
            collapsed: node.collapsed,
            selected: node.id == self.selected,
            marked: self.connect_source.as_deref() == Some(node.id.as_str()),
        }
    }

    fn render_edges(&self) -> Vec<RenderEdge> {
        self.map
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Tree || self.config.show_manual_edges)
            .filter_map(|edge| {
                let source = self.map.node(&edge.source)?;
                let target = self.map.node(&edge.target)?;
                let (open, close) = border_marks(source.style.as_ref());
                Some(RenderEdge {
                    from: source.position?,
                    to: target.position?,
                    from_width: source.label.chars().count()
                        + open.chars().count()
                        + close.chars().count(),
                    kind: edge.kind,
                    color: target.branch_color,
                })
            })
            .collect()
    }

    /// Scroll the diagram so the selection stays on screen.
    fn follow(&mut self) {
        if !self.follow_selection {
            return;
        }
        let Some(pos) = self.map.node(&self.selected).and_then(|n| n.position) else {
            return;
        };
        if !self.viewport.contains(self.content_area, pos, FOLLOW_MARGIN) {
            self.viewport.center_x = pos.x;
            self.viewport.center_y = pos.y;
        }
    }

    fn mode_label(&self) -> &'static str {
        if self.show_settings {
            return "Settings";
        }
        if self.pending_text.is_some() {
            return "Editing";
        }
        if self.pending_confirm.is_some() {
            return "Confirming";
        }
        match self.mode {
            Mode::Normal if self.pan_mode => "Pan",
            Mode::Normal => "Normal",
            Mode::Connecting => "Connect",
        }
    }

    fn hints(&self) -> String {
        if self.show_settings {
            return "[j/k or arrows] select  [h/l or Enter] change  [Esc] close".to_string();
        }
        if self.pending_text.is_some() {
            return "type text, [Backspace] delete, [Enter] apply, [Esc] cancel".to_string();
        }
        if self.pending_confirm.is_some() {
            return "[y] confirm  [n/Esc] cancel".to_string();
        }
        match self.mode {
            Mode::Normal if self.pan_mode => {
                "[arrows/hjkl] pan  [+/-] zoom  [p] exit pan  [q] quit".to_string()
            }
            Mode::Normal => "[Tab] child  [Enter] sibling  [e] rename  [D] delete  [c] connect  \
                 [v] view  [z] fold  [s] setup  [?] help"
                .to_string(),
            Mode::Connecting => {
                "CONNECT: [j/k/h/l] pick target  [Enter] link  [Esc] cancel".to_string()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.mode != Mode::Connecting {
            self.status_message = None;
        }

        if self.show_settings {
            match settings::handle_key(key, &mut self.settings_state, &mut self.config) {
                SettingsEvent::Changed => {
                    self.map.set_settings(self.config.settings());
                    self.persist_config()?;
                }
                SettingsEvent::Close => self.show_settings = false,
                SettingsEvent::None => {}
            }
            return Ok(false);
        }

        if self.pending_confirm.is_some() {
            self.handle_confirm_key(key);
            return Ok(false);
        }

        let in_text_mode = self.pending_text.is_some();
        let action = input::action_for_key(key, in_text_mode);
        if in_text_mode {
            self.handle_text_action(action);
            return Ok(false);
        }

        match action {
            Action::Quit => return Ok(true),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::OpenSettings => self.show_settings = true,
            Action::ZoomIn => self.zoom(1.0 / ZOOM_FACTOR),
            Action::ZoomOut => self.zoom(ZOOM_FACTOR),
            Action::TogglePan => self.pan_mode = !self.pan_mode,
            Action::Pan(direction) => self.pan(direction),
            Action::Move(direction) if self.pan_mode => self.pan(direction),
            Action::Move(direction) => self.move_selection(direction),
            Action::Recenter => {
                self.viewport.scale = DEFAULT_SCALE;
                self.follow_selection = true;
                if let Some(pos) = self.map.node(&self.selected).and_then(|n| n.position) {
                    self.viewport.center_x = pos.x;
                    self.viewport.center_y = pos.y;
                }
            }
            Action::ToggleView => self.view = self.view.toggle(),
            Action::Activate if self.mode == Mode::Connecting => self.finish_connect(),
            Action::Activate => self.start_add_prompt(false),
            Action::AddChild => self.start_add_prompt(true),
            Action::Rename => self.start_rename_prompt(),
            Action::DeleteNode => self.start_delete_prompt(),
            Action::StartConnect => self.start_connect(),
            Action::Disconnect => self.disconnect_selected(),
            Action::ToggleCollapse => self.toggle_collapse(),
            Action::Cancel => self.cancel_current_mode(),
            Action::Noop | Action::SubmitText | Action::Backspace | Action::InputChar(_) => {}
        }
        Ok(false)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(PendingConfirm::DeleteNode { id, label, .. }) =
                    self.pending_confirm.take()
                {
                    self.delete_node(&id, &label);
                }
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.pending_confirm = None;
            }
            _ => {}
        }
    }

    fn handle_text_action(&mut self, action: Action) {
        match action {
            Action::SubmitText => {
                if let Some(prompt) = self.pending_text.take() {
                    self.apply_text_prompt(prompt);
                }
            }
            Action::Cancel => self.pending_text = None,
            Action::Backspace => {
                if let Some(prompt) = &mut self.pending_text
                    && prompt.cursor > 0
                {
                    let from = byte_index_for_cursor(&prompt.buffer, prompt.cursor - 1);
                    let to = byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.replace_range(from..to, "");
                    prompt.cursor -= 1;
                }
            }
            Action::InputChar(c) => {
                if let Some(prompt) = &mut self.pending_text {
                    let at = byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.insert(at, c);
                    prompt.cursor += 1;
                }
            }
            Action::Move(Direction::Left) => {
                if let Some(prompt) = &mut self.pending_text {
                    prompt.cursor = prompt.cursor.saturating_sub(1);
                }
            }
            Action::Move(Direction::Right) => {
                if let Some(prompt) = &mut self.pending_text {
                    let max = prompt.buffer.chars().count();
                    prompt.cursor = (prompt.cursor + 1).min(max);
                }
            }
            _ => {}
        }
    }

    fn apply_text_prompt(&mut self, prompt: PendingText) {
        let label = clean_label(&prompt.buffer);
        let label = label.as_str();
        if label.is_empty() {
            self.status_message = Some("label cannot be empty".to_string());
            return;
        }
        match prompt.kind {
            PendingTextKind::AddChild { anchor } => {
                // a new child of a folded topic would be invisible
                if self.map.node(&anchor).is_some_and(|n| n.collapsed) {
                    self.map.toggle_collapsed(&anchor);
                }
                match self.map.add_child(&anchor, label) {
                    Some(id) => self.select_new(id),
                    None => self.status_message = Some("could not add topic".to_string()),
                }
            }
            PendingTextKind::AddSibling { anchor } => match self.map.add_sibling(&anchor, label) {
                Some(id) => self.select_new(id),
                None => {
                    self.status_message = Some("next sibling slot is already taken".to_string())
                }
            },
            PendingTextKind::Rename { id } => {
                if self.map.rename_node(&id, label) {
                    self.status_message = Some(format!("renamed to {label}"));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn start_add_prompt(&mut self, child: bool) {
        let Some(node) = self.map.node(&self.selected) else {
            return;
        };
        if !child && node.is_root {
            self.status_message = Some("the root has no siblings; Tab adds a child".to_string());
            return;
        }
        let (title, kind) = if child {
            (
                format!("New topic under {}", node.label),
                PendingTextKind::AddChild {
                    anchor: node.id.clone(),
                },
            )
        } else {
            (
                format!("New topic beside {}", node.label),
                PendingTextKind::AddSibling {
                    anchor: node.id.clone(),
                },
            )
        };
        self.pending_text = Some(PendingText {
            title,
            buffer: String::new(),
            cursor: 0,
            kind,
        });
    }

    fn start_rename_prompt(&mut self) {
        let Some(node) = self.map.node(&self.selected) else {
            return;
        };
        self.pending_text = Some(PendingText {
            title: format!("Rename {}", node.path),
            buffer: node.label.clone(),
            cursor: node.label.chars().count(),
            kind: PendingTextKind::Rename {
                id: node.id.clone(),
            },
        });
    }

    fn start_delete_prompt(&mut self) {
        let Some(node) = self.map.node(&self.selected) else {
            return;
        };
        if node.is_root {
            self.status_message = Some("the root topic cannot be deleted".to_string());
            return;
        }
        let count = self
            .map
            .nodes()
            .iter()
            .filter(|n| n.id == node.id || n.path.is_descendant_of(&node.path))
            .count();
        self.pending_confirm = Some(PendingConfirm::DeleteNode {
            id: node.id.clone(),
            label: node.label.clone(),
            count,
        });
    }

    fn delete_node(&mut self, id: &str, label: &str) {
        let parent = self.map.parent_of(id).map(|n| n.id.clone());
        let Some(removed) = self.map.delete_node(id) else {
            return;
        };
        if let Some(parent) = parent {
            self.selected = parent;
        }
        self.ensure_selection();
        self.status_message = Some(match removed.len() {
            1 => format!("deleted {label}"),
            n => format!("deleted {label} and {} below it", n - 1),
        });
    }

    fn start_connect(&mut self) {
        if self.map.node(&self.selected).is_none() {
            return;
        }
        self.connect_source = Some(self.selected.clone());
        self.mode = Mode::Connecting;
        self.status_message = Some("connect: move to the target and press Enter".to_string());
    }

    fn finish_connect(&mut self) {
        let Some(source) = self.connect_source.take() else {
            self.mode = Mode::Normal;
            return;
        };
        self.mode = Mode::Normal;
        let label = |id: &str| {
            self.map
                .node(id)
                .map(|n| n.label.clone())
                .unwrap_or_default()
        };
        let (from, to) = (label(&source), label(&self.selected));
        self.status_message = Some(match self.map.connect(&source, &self.selected) {
            Some(_) => format!("connected {from} -> {to}"),
            None => "cannot connect: same topic or already linked".to_string(),
        });
    }

    fn disconnect_selected(&mut self) {
        let edge_id = self
            .map
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Manual && e.touches(&self.selected))
            .min_by_key(|e| e.source != self.selected)
            .map(|e| e.id.clone());
        let Some(id) = edge_id else {
            self.status_message = Some("no connection on this topic".to_string());
            return;
        };
        if self.map.disconnect(&id) {
            self.status_message = Some(format!("removed connection {id}"));
        }
    }

    fn toggle_collapse(&mut self) {
        if !self.map.has_children(&self.selected) {
            return;
        }
        self.map.toggle_collapsed(&self.selected);
    }

    fn cancel_current_mode(&mut self) {
        if self.mode == Mode::Connecting {
            self.status_message = Some("connect cancelled".to_string());
        }
        self.mode = Mode::Normal;
        self.connect_source = None;
        self.show_help = false;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    fn move_selection(&mut self, direction: Direction) {
        self.follow_selection = true;
        match direction {
            Direction::Up | Direction::Down => {
                let rows = self.visible_ids();
                let Some(idx) = rows.iter().position(|id| *id == self.selected) else {
                    return;
                };
                let next = match direction {
                    Direction::Up => idx.saturating_sub(1),
                    _ => (idx + 1).min(rows.len().saturating_sub(1)),
                };
                if let Some(id) = rows.get(next) {
                    self.selected = id.clone();
                }
            }
            Direction::Left => {
                if let Some(parent) = self.map.parent_of(&self.selected) {
                    self.selected = parent.id.clone();
                }
            }
            Direction::Right => {
                if self.map.node(&self.selected).is_some_and(|n| n.collapsed) {
                    self.map.toggle_collapsed(&self.selected);
                }
                if let Some(child) = self.map.children(&self.selected).first() {
                    self.selected = child.id.clone();
                }
            }
        }
    }

    fn visible_ids(&self) -> Vec<String> {
        self.map
            .outline_rows(true)
            .into_iter()
            .map(|(n, _)| n.id.clone())
            .collect()
    }

    /// Keep `selected` on an existing topic that the outline shows.
    fn ensure_selection(&mut self) {
        if self.map.node(&self.selected).is_none() {
            self.selected = self.map.root().map(|n| n.id.clone()).unwrap_or_default();
            return;
        }
        let visible = self.visible_ids();
        let mut current = self.selected.clone();
        while !visible.contains(&current) {
            match self.map.parent_of(&current) {
                Some(parent) => current = parent.id.clone(),
                None => break,
            }
        }
        self.selected = current;
    }

    fn select_new(&mut self, id: String) {
        let path = self
            .map
            .node(&id)
            .map(|n| n.path.to_string())
            .unwrap_or_default();
        self.status_message = Some(format!("added topic {path}"));
        self.selected = id;
        self.follow_selection = true;
    }

    fn pan(&mut self, direction: Direction) {
        self.follow_selection = false;
        let dx = PAN_STEP * self.viewport.scale;
        let dy = PAN_STEP / 2.0 * self.viewport.scale * ROW_ASPECT;
        match direction {
            Direction::Left => self.viewport.center_x -= dx,
            Direction::Right => self.viewport.center_x += dx,
            Direction::Up => self.viewport.center_y -= dy,
            Direction::Down => self.viewport.center_y += dy,
        }
    }

    fn zoom(&mut self, factor: f64) {
        self.viewport.scale = (self.viewport.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    fn persist_config(&self) -> Result<()> {
        if self.demo {
            return Ok(());
        }
        if let Some(root) = &self.store_root {
            store::save_config(root, &self.config)?;
        }
        Ok(())
    }
}

pub fn run(source: MapSource, open_settings: bool) -> Result<()> {
    let mut app = AppState::load(&source, open_settings)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            if app.handle_key(key)? {
                break;
            }
        }
    }

    if app.persist_map {
        info!(nodes = app.map.nodes().len(), "closing map");
    }
    app.map.clear_listener();
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn draw_text_prompt(frame: &mut Frame, prompt: &PendingText) {
    let area = centered_rect(frame.area(), 60, 24);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            prompt.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        line_with_cursor(
            &prompt.buffer,
            prompt.cursor,
            "topic label",
            Style::default().fg(Color::White),
            Style::default().fg(Color::DarkGray),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Enter applies, Esc cancels.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .title(" topic ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(2, 2, 1, 0)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_confirm_prompt(frame: &mut Frame, confirm: &PendingConfirm) {
    let area = centered_rect(frame.area(), 56, 22);
    frame.render_widget(Clear, area);
    let PendingConfirm::DeleteNode { label, count, .. } = confirm;
    let text = format!("Delete \"{label}\"?");
    let detail = match count {
        1 => "It has no topics below it.".to_string(),
        n => format!("{} topics below it go too.", n - 1),
    };
    let paragraph = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {detail}"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "[y/Enter]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "[n/Esc]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" no", Style::default().fg(Color::DarkGray)),
        ]),
    ])
    .block(
        Block::default()
            .title(" confirm ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

fn line_with_cursor(
    text: &str,
    cursor: usize,
    placeholder: &str,
    text_style: Style,
    placeholder_style: Style,
    caret_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    let char_len = text.chars().count();
    let clamped = cursor.min(char_len);

    if char_len == 0 {
        spans.push(Span::styled("▌", caret_style));
        if !placeholder.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(placeholder.to_string(), placeholder_style));
        }
        return Line::from(spans);
    }

    let split = byte_index_for_cursor(text, clamped);
    let (left, right) = text.split_at(split);
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

fn demo_map(config: &Config) -> MindMap {
    let mut map = MindMap::new("Mind Maps", config.settings());
    let Some(root) = map.root().map(|n| n.id.clone()) else {
        return map;
    };
    let branches: [(&str, &[&str]); 4] = [
        ("Uses", &["Brainstorming", "Note taking", "Planning"]),
        ("Structure", &["Central idea", "Branches", "Paths like 1.2.1"]),
        ("Editing", &["Tab adds a child", "Enter adds a sibling", "e renames"]),
        ("Views", &["Diagram", "Outline"]),
    ];
    let mut planning = None;
    let mut branches_topic = None;
    for (branch, leaves) in branches {
        let Some(branch_id) = map.add_child(&root, branch) else {
            continue;
        };
        for leaf in leaves {
            let id = map.add_child(&branch_id, leaf);
            match *leaf {
                "Planning" => planning = id,
                "Branches" => branches_topic = id,
                _ => {}
            }
        }
    }
    if let (Some(from), Some(to)) = (planning, branches_topic) {
        map.connect(&from, &to);
    }
    map
}
