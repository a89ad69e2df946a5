//! `mindtree add` — add a topic under (or beside) an existing one.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::commands::editing::{OpenMap, print_skipped};
use crate::map::model::clean_label;
use crate::map::session::Placement;
use crate::store;

pub fn run(map: &str, label: &str, parent: Option<&str>, sibling: bool) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map, label, parent, sibling)?;
    Ok(())
}

/// `parent` names the anchor topic (id or path), defaulting to the root.
/// With `sibling` the new topic goes beside the anchor instead of below it.
///
/// Returns the new topic's id, or `None` when nothing was added.
pub fn run_in(
    root: &Path,
    map: &str,
    label: &str,
    parent: Option<&str>,
    sibling: bool,
) -> Result<Option<String>> {
    let label = clean_label(label);
    let label = label.as_str();
    if label.is_empty() {
        bail!("topic label must not be empty");
    }

    let mut open = OpenMap::open(root, map)?;
    let anchor = match parent {
        Some(key) => open.find_node(key),
        None => open.map.root(),
    };
    let Some(anchor_id) = anchor.map(|n| n.id.clone()) else {
        return Ok(None);
    };

    let placement = if sibling {
        Placement::Sibling
    } else {
        Placement::Child
    };
    let Some(id) = open.map.add_node(Some(&anchor_id), label, placement) else {
        print_skipped(if sibling {
            "the root has no siblings, or the next sibling slot is taken"
        } else {
            "could not add topic"
        });
        return Ok(None);
    };

    let path = open
        .map
        .node(&id)
        .map(|n| n.path.to_string())
        .unwrap_or_default();
    open.save()?;
    println!(
        "  {} {} {}",
        "Added".green().bold(),
        label,
        format!("at {} (#{})", path, id).dark_grey()
    );
    Ok(Some(id))
}
