//! `mindtree rename-map` / `mindtree delete-map` — manage whole maps.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;
use tracing::info;

use crate::store::{self, MapRecord};

pub fn run_rename(map: &str, name: &str) -> Result<()> {
    let root = store::find_root()?;
    rename_in(&root, map, name)?;
    Ok(())
}

pub fn run_delete(map: &str, yes: bool) -> Result<()> {
    let root = store::find_root()?;
    delete_in(&root, map, yes)?;
    Ok(())
}

pub fn rename_in(root: &Path, map: &str, name: &str) -> Result<MapRecord> {
    let before = store::resolve_map(root, map)?.name;
    let record = store::rename_map(root, map, name)?;
    println!(
        "  {} {} -> {} {}",
        "Renamed".green().bold(),
        before,
        record.name,
        format!("(#{})", record.id).dark_grey()
    );
    Ok(record)
}

/// Deleting is permanent, so it needs `yes`.
pub fn delete_in(root: &Path, map: &str, yes: bool) -> Result<MapRecord> {
    if !yes {
        let record = store::resolve_map(root, map)?;
        bail!(
            "`{}` has {} topics and cannot be restored. Re-run with --yes to delete it",
            record.name,
            record.node_count()
        );
    }
    let record = store::delete_map(root, map)?;
    info!(id = %record.id, "deleted map");
    println!(
        "  {} {} {}",
        "Deleted".red().bold(),
        record.name,
        format!("(#{})", record.id).dark_grey()
    );
    Ok(record)
}
