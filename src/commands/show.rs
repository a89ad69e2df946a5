//! `mindtree show` — print every topic with its path, position and color.

use std::path::Path;

use anyhow::Result;
use crossterm::style::{Color, Stylize};

use crate::commands::editing::OpenMap;
use crate::map::color::Rgb;
use crate::map::model::{EdgeKind, Position};
use crate::map::session::MindMap;
use crate::store;

pub fn run(map: &str) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map)
}

pub fn run_in(root: &Path, map: &str) -> Result<()> {
    let open = OpenMap::open(root, map)?;
    println!(
        "  {} {}",
        open.record.name.as_str().bold(),
        format!("({})", open.record.id).dark_grey()
    );

    for row in topic_rows(&open.map) {
        let label = match row.color {
            Some(c) => row.label.as_str().with(to_term_color(c)),
            None => row.label.as_str().stylize(),
        };
        let position = match row.position {
            Some(p) => format!("({:.0}, {:.0})", p.x, p.y),
            None => "unplaced".to_string(),
        };
        println!(
            "  {}{} {} {}",
            "  ".repeat(row.depth),
            label,
            row.path.dark_grey(),
            format!("#{} {}", row.id, position).dark_grey()
        );
    }

    let links = manual_links(&open.map);
    if !links.is_empty() {
        println!();
        println!("  {}", "Connections".cyan().bold());
        for (edge_id, from, to) in links {
            println!("  {} -> {} {}", from, to, format!("[{edge_id}]").dark_grey());
        }
    }

    for warning in &open.map.layout_report().warnings {
        println!("  {} {}", "Warning".yellow().bold(), warning);
    }
    Ok(())
}

/// One line of `show` output, before styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRow {
    pub depth: usize,
    pub id: String,
    pub path: String,
    pub label: String,
    pub color: Option<Rgb>,
    pub position: Option<Position>,
}

pub fn topic_rows(map: &MindMap) -> Vec<TopicRow> {
    map.outline_rows(false)
        .into_iter()
        .map(|(node, depth)| TopicRow {
            depth,
            id: node.id.clone(),
            path: node.path.to_string(),
            label: node.label.clone(),
            color: node.branch_color,
            position: node.position,
        })
        .collect()
}

/// Manual edges as `(edge id, source label, target label)`.
pub fn manual_links(map: &MindMap) -> Vec<(String, String, String)> {
    let label = |id: &str| {
        map.node(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    };
    map.edges()
        .iter()
        .filter(|e| e.kind == EdgeKind::Manual)
        .map(|e| (e.id.clone(), label(&e.source), label(&e.target)))
        .collect()
}

fn to_term_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
