//! `mindtree rename` — change a topic's label.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::commands::editing::{OpenMap, print_skipped};
use crate::map::model::clean_label;
use crate::store;

pub fn run(map: &str, node: &str, label: &str) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map, node, label)?;
    Ok(())
}

pub fn run_in(root: &Path, map: &str, node: &str, label: &str) -> Result<bool> {
    let label = clean_label(label);
    let label = label.as_str();
    if label.is_empty() {
        bail!("topic label must not be empty");
    }
    let mut open = OpenMap::open(root, map)?;
    let Some((id, old)) = open.find_node(node).map(|n| (n.id.clone(), n.label.clone())) else {
        return Ok(false);
    };
    if !open.map.rename_node(&id, label) {
        print_skipped("label unchanged");
        return Ok(false);
    }
    open.save()?;
    println!("  {} {} -> {}", "Renamed".green().bold(), old, label);
    Ok(true)
}
