use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::map::color::Rgb;
use crate::map::model::{BorderStyle, EdgeKind, NodeStyle, Position};
use crate::parser::config::ViewMode;
use crate::tui::settings::centered_rect;

/// Diagram units per terminal row, relative to units per column.
pub const ROW_ASPECT: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub path: String,
    pub depth: usize,
    pub color: Option<Rgb>,
    pub position: Option<Position>,
    pub style: Option<NodeStyle>,
    pub is_root: bool,
    pub has_children: bool,
    pub collapsed: bool,
    pub selected: bool,
    /// Source of a connection being drawn.
    pub marked: bool,
}

#[derive(Debug, Clone)]
pub struct RenderEdge {
    pub from: Position,
    pub to: Position,
    /// Width of the source label, so the line starts after the text.
    pub from_width: usize,
    pub kind: EdgeKind,
    pub color: Option<Rgb>,
}

/// Visible window onto diagram space. `scale` is diagram units per column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Viewport {
    /// Half extents of `area` in diagram units.
    pub fn half_extents(&self, area: Rect) -> (f64, f64) {
        (
            f64::from(area.width) * self.scale / 2.0,
            f64::from(area.height) * self.scale * ROW_ASPECT / 2.0,
        )
    }

    /// Whether `p` falls inside `area`, leaving `margin` columns spare.
    pub fn contains(&self, area: Rect, p: Position, margin: f64) -> bool {
        let (hw, hh) = self.half_extents(area);
        let mx = margin * self.scale;
        let my = margin * self.scale * ROW_ASPECT / 2.0;
        (p.x - self.center_x).abs() <= (hw - mx).max(0.0)
            && (p.y - self.center_y).abs() <= (hh - my).max(0.0)
    }
}

#[derive(Debug)]
pub struct CanvasRenderData<'a> {
    pub map_name: &'a str,
    pub view: ViewMode,
    /// Outline order with collapsed branches hidden.
    pub rows: &'a [RenderNode],
    /// Every node, for the diagram.
    pub nodes: &'a [RenderNode],
    pub edges: &'a [RenderEdge],
    pub viewport: Viewport,
    pub selected_label: &'a str,
    pub selected_path: &'a str,
    pub node_count: usize,
    pub mode_label: &'a str,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub show_help: bool,
    pub connect_mode: bool,
    pub demo: bool,
}

/// The part of the frame the diagram or outline is drawn into.
pub fn content_area(frame_area: Rect) -> Rect {
    let [content, _status] = split_body(frame_area);
    content
}

fn split_body(frame_area: Rect) -> [Rect; 2] {
    let area = frame_area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let inner = outer_block(Line::default()).inner(area);
    Layout::vertical([Constraint::Min(4), Constraint::Length(4)]).areas(inner)
}

fn outer_block(title: Line<'_>) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .padding(Padding::new(1, 1, 0, 0))
        .title(title)
}

pub fn draw(frame: &mut Frame, data: &CanvasRenderData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let badge = if data.connect_mode {
        Some(("CONNECT", Color::Green))
    } else if data.demo {
        Some(("DEMO", Color::Yellow))
    } else {
        None
    };
    let mut title_spans = vec![
        Span::styled("mindtree", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(data.map_name, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!("[v] {}", data.view.as_str()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ];
    if let Some((label, color)) = badge {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            format!("[{}]", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    let border_color = badge.map(|(_, c)| c).unwrap_or(Color::DarkGray);
    let block = outer_block(Line::from(title_spans)).border_style(Style::default().fg(border_color));
    frame.render_widget(block, area);

    let [content, status_area] = split_body(frame.area());
    match data.view {
        ViewMode::Diagram => draw_diagram(frame, content, data),
        ViewMode::Outline => draw_outline(frame, content, data),
    }
    draw_status(frame, status_area, data);

    if data.show_help {
        render_help_overlay(frame);
    }
}

// ---------------------------------------------------------------------------
// Diagram
// ---------------------------------------------------------------------------

fn draw_diagram(frame: &mut Frame, area: Rect, data: &CanvasRenderData<'_>) {
    let vp = data.viewport;
    let (hw, hh) = vp.half_extents(area);
    // canvas y grows upward, diagram y grows downward
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([vp.center_x - hw, vp.center_x + hw])
        .y_bounds([-(vp.center_y + hh), -(vp.center_y - hh)])
        .paint(|ctx| {
            for edge in data.edges {
                paint_edge(ctx, edge, vp.scale);
            }
            ctx.layer();
            for node in data.nodes {
                let Some(pos) = node.position else {
                    continue;
                };
                ctx.print(pos.x, -pos.y, diagram_label(node));
            }
        });
    frame.render_widget(canvas, area);

    if data.nodes.iter().all(|n| n.position.is_none()) {
        let empty = Paragraph::new(Line::from(Span::styled(
            "nothing to draw",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(empty, area);
    }
}

fn paint_edge(ctx: &mut Context<'_>, edge: &RenderEdge, scale: f64) {
    let x1 = edge.from.x + (edge.from_width as f64 + 1.0) * scale;
    let y1 = -edge.from.y;
    let x2 = edge.to.x - scale;
    let y2 = -edge.to.y;
    match edge.kind {
        EdgeKind::Tree => ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: edge.color.map(to_color).unwrap_or(Color::Gray),
        }),
        EdgeKind::Manual => {
            // dotted, one dot per column
            let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            let steps = (len / scale).ceil().max(1.0) as usize;
            let coords: Vec<(f64, f64)> = (0..=steps)
                .step_by(2)
                .map(|i| {
                    let t = i as f64 / steps as f64;
                    (x1 + (x2 - x1) * t, y1 + (y2 - y1) * t)
                })
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Magenta,
            });
        }
    }
}

fn diagram_label(node: &RenderNode) -> Line<'static> {
    let (open, close) = border_marks(node.style.as_ref());
    let style = node_style(node);
    let mut spans = Vec::new();
    if !open.is_empty() {
        spans.push(Span::styled(open, border_style(node)));
    }
    spans.push(Span::styled(node.label.clone(), style));
    if !close.is_empty() {
        spans.push(Span::styled(close, border_style(node)));
    }
    if node.collapsed && node.has_children {
        spans.push(Span::styled(" +", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

/// Bracket characters standing in for a node border.
pub fn border_marks(style: Option<&NodeStyle>) -> (&'static str, &'static str) {
    match style.and_then(|s| s.border_style) {
        Some(BorderStyle::Solid) => ("[", "]"),
        Some(BorderStyle::Dashed) => ("¦", "¦"),
        Some(BorderStyle::Dotted) => ("(", ")"),
        None => ("", ""),
    }
}

fn border_style(node: &RenderNode) -> Style {
    let color = node
        .style
        .as_ref()
        .and_then(|s| s.border_color)
        .or(node.color)
        .map(to_color)
        .unwrap_or(Color::Gray);
    Style::default().fg(color)
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

fn draw_outline(frame: &mut Frame, area: Rect, data: &CanvasRenderData<'_>) {
    let lines: Vec<Line> = data.rows.iter().map(outline_line).collect();
    let selected = data.rows.iter().position(|r| r.selected).unwrap_or(0);
    let height = usize::from(area.height.max(1));
    let scroll = (selected + 1).saturating_sub(height);
    let outline = Paragraph::new(lines).scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(outline, area);
}

pub fn outline_marker(node: &RenderNode) -> &'static str {
    match (node.has_children, node.collapsed) {
        (true, true) => "▸",
        (true, false) => "▾",
        (false, _) => "•",
    }
}

fn outline_line(node: &RenderNode) -> Line<'static> {
    let mut label_style = node_style(node);
    let marker_color = node.color.map(to_color).unwrap_or(Color::Gray);
    let mut spans = vec![
        Span::raw("    ".repeat(node.depth)),
        Span::styled(outline_marker(node), Style::default().fg(marker_color)),
        Span::raw(" "),
    ];
    if node.selected {
        label_style = label_style.bg(Color::DarkGray);
    }
    spans.push(Span::styled(node.label.clone(), label_style));
    spans.push(Span::styled(
        format!("  {}", node.path),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Shared styling
// ---------------------------------------------------------------------------

fn node_style(node: &RenderNode) -> Style {
    let overrides = node.style.as_ref();
    let fg = overrides
        .and_then(|s| s.text_color)
        .or(node.color)
        .map(to_color)
        .unwrap_or(Color::White);
    let mut style = Style::default().fg(fg);
    if let Some(bg) = overrides.and_then(|s| s.background_color) {
        style = style.bg(to_color(bg));
    }
    if node.is_root || overrides.and_then(|s| s.font_weight).is_some_and(|w| w.is_heavy()) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if node.selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if node.marked {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

pub fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

// ---------------------------------------------------------------------------
// Status and overlays
// ---------------------------------------------------------------------------

fn draw_status(frame: &mut Frame, area: Rect, data: &CanvasRenderData<'_>) {
    let top_status = format!(
        "SELECTED: {} ({})   topics: {}   {}",
        data.selected_label, data.selected_path, data.node_count, data.mode_label
    );
    let mut hint_line = data.hints.to_string();
    if let Some(msg) = data.message {
        hint_line.push_str("   ");
        hint_line.push_str(msg);
    }
    let accent = if data.connect_mode {
        Color::Green
    } else {
        Color::Cyan
    };

    let status = Paragraph::new(vec![
        Line::from(Span::styled(
            top_status,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            hint_line,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if data.connect_mode {
                Color::Green
            } else {
                Color::DarkGray
            }))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(status, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 70);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("EDIT"),
        Line::from("  Tab        add a child to the selected topic"),
        Line::from("  Enter      add a sibling below the selected topic"),
        Line::from("  e / F2     rename"),
        Line::from("  D / Del    delete the topic and everything under it"),
        Line::from("  c          connect: pick a target, then Enter"),
        Line::from("  d          remove a connection from the selected topic"),
        Line::from(""),
        Line::from("MOVE"),
        Line::from("  j/k, arrows  previous / next topic in outline order"),
        Line::from("  h / l        parent / first child"),
        Line::from("  z / Space    fold or unfold (outline)"),
        Line::from(""),
        Line::from("VIEW"),
        Line::from("  v          switch diagram / outline"),
        Line::from("  + / -      zoom     H/J/K/L or Shift+arrows  pan"),
        Line::from("  p          pan mode     0  recenter on selection"),
        Line::from("  s          settings     q  quit"),
        Line::from(""),
        Line::from("Esc backs out of prompts and connect mode."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: &str) -> RenderNode {
        RenderNode {
            id: "1".into(),
            label: label.into(),
            path: "1".into(),
            depth: 0,
            color: None,
            position: Some(Position::ORIGIN),
            style: None,
            is_root: false,
            has_children: false,
            collapsed: false,
            selected: false,
            marked: false,
        }
    }

    #[test]
    fn outline_markers() {
        let mut n = node("a");
        assert_eq!(outline_marker(&n), "•");
        n.has_children = true;
        assert_eq!(outline_marker(&n), "▾");
        n.collapsed = true;
        assert_eq!(outline_marker(&n), "▸");
    }

    #[test]
    fn style_overrides_beat_branch_color() {
        let mut n = node("a");
        n.color = Some(Rgb::new(1, 2, 3));
        assert_eq!(node_style(&n).fg, Some(Color::Rgb(1, 2, 3)));
        n.style = Some(NodeStyle {
            text_color: Some(Rgb::new(9, 9, 9)),
            ..NodeStyle::default()
        });
        assert_eq!(node_style(&n).fg, Some(Color::Rgb(9, 9, 9)));
    }

    #[test]
    fn border_marks_follow_style() {
        let dotted = NodeStyle {
            border_style: Some(BorderStyle::Dotted),
            ..NodeStyle::default()
        };
        assert_eq!(border_marks(Some(&dotted)), ("(", ")"));
        assert_eq!(border_marks(None), ("", ""));
    }

    #[test]
    fn viewport_containment_respects_margin() {
        let vp = Viewport {
            center_x: 0.0,
            center_y: 0.0,
            scale: 10.0,
        };
        let area = Rect::new(0, 0, 40, 10);
        // half extents: 200 wide, 100 tall
        assert!(vp.contains(area, Position::new(150.0, 50.0), 0.0));
        assert!(!vp.contains(area, Position::new(250.0, 0.0), 0.0));
        assert!(!vp.contains(area, Position::new(190.0, 0.0), 2.0));
    }
}
