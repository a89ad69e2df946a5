//! `mindtree delete` — remove a topic and everything below it.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::commands::editing::{OpenMap, print_skipped};
use crate::store;

pub fn run(map: &str, node: &str) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map, node)?;
    Ok(())
}

/// Returns how many topics were removed.
pub fn run_in(root: &Path, map: &str, node: &str) -> Result<usize> {
    let mut open = OpenMap::open(root, map)?;
    let Some(target) = open.find_node(node) else {
        return Ok(0);
    };
    if target.is_root {
        print_skipped("the root topic cannot be deleted");
        return Ok(0);
    }
    let id = target.id.clone();
    let label = target.label.clone();

    let Some(removed) = open.map.delete_node(&id) else {
        return Ok(0);
    };
    open.save()?;
    let extra = match removed.len() {
        1 => String::new(),
        n => format!(" and {} topics below it", n - 1),
    };
    println!("  {} {}{}", "Deleted".red().bold(), label, extra);
    Ok(removed.len())
}
