//! `mindtree list` — print stored maps, most recently updated first.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::store::{self, MapRecord};

pub fn run(search: Option<&str>) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, search)
}

pub fn run_in(root: &Path, search: Option<&str>) -> Result<()> {
    let maps = store::list_maps(root)?;
    let shown = match search {
        Some(query) => store::search_maps(&maps, query),
        None => maps.iter().collect(),
    };

    if shown.is_empty() {
        match search {
            Some(query) => println!("  No maps match `{}`.", query),
            None => println!("  No maps yet. Create one with `mindtree new <name>`."),
        }
        return Ok(());
    }

    let now = store::now_millis();
    let width = shown.iter().map(|m| m.name.chars().count()).max().unwrap_or(0);
    for record in shown {
        let (name, details) = list_row(record, now);
        let padded = format!("{:<width$}", name, width = width);
        println!("  {}  {}", padded.bold(), details.dark_grey());
    }
    Ok(())
}

fn list_row(record: &MapRecord, now: u64) -> (String, String) {
    let topics = match record.node_count() {
        1 => "1 topic".to_string(),
        n => format!("{n} topics"),
    };
    (
        record.name.clone(),
        format!(
            "{}  {}  updated {}",
            record.id,
            topics,
            format_age(now, record.updated_at)
        ),
    )
}

/// Coarse "how long ago" for a pair of unix-millisecond timestamps.
fn format_age(now: u64, then: u64) -> String {
    let secs = now.saturating_sub(then) / 1000;
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86_400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
