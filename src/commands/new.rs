//! `mindtree new` — create a map, optionally from an outline file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::info;

use crate::map::session::MindMap;
use crate::parser::outline;
use crate::store::{self, MapRecord};

pub fn run(name: &str, from_outline: Option<&Path>) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, name, from_outline)?;
    Ok(())
}

/// Without an outline the map starts as a single root labelled `name`.
pub fn run_in(root: &Path, name: &str, from_outline: Option<&Path>) -> Result<MapRecord> {
    let settings = store::load_config(root)?.settings();
    let map = match from_outline {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let entries = outline::parse(&content)
                .with_context(|| format!("invalid outline in {}", path.display()))?;
            outline::to_map(&entries, settings)?
        }
        None => MindMap::new(name.trim(), settings),
    };

    let record = store::create_map(root, name, map.into_data())?;
    info!(id = %record.id, nodes = record.node_count(), "created map");
    println!(
        "  {} {} {}",
        "Created".green().bold(),
        record.name.as_str().bold(),
        format!("({}, {} topics)", record.id, record.node_count()).dark_grey()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        store::init(dir.path()).unwrap();
        dir
    }

    #[test]
    fn plain_map_has_named_root() {
        let dir = store_dir();
        let record = run_in(dir.path(), "Kitchen remodel", None).unwrap();
        assert_eq!(record.node_count(), 1);
        assert_eq!(
            record.data.root().map(|n| n.label.as_str()),
            Some("Kitchen remodel")
        );
    }

    #[test]
    fn outline_file_builds_tree() {
        let dir = store_dir();
        let file = dir.path().join("plan.txt");
        fs::write(&file, "Plan\n    Design\n        Sketches\n    Budget\n").unwrap();
        let record = run_in(dir.path(), "Plan", Some(&file)).unwrap();
        assert_eq!(record.node_count(), 4);
        assert_eq!(record.data.edges.len(), 3);

        let loaded = store::load_map(dir.path(), &record.id).unwrap();
        let sketches = loaded.data.nodes.iter().find(|n| n.label == "Sketches").unwrap();
        assert_eq!(sketches.path.to_string(), "1.1.1");
    }

    #[test]
    fn bad_outline_is_an_error() {
        let dir = store_dir();
        let file = dir.path().join("bad.txt");
        fs::write(&file, "Root\nSecond root\n").unwrap();
        assert!(run_in(dir.path(), "Bad", Some(&file)).is_err());
        assert!(store::list_maps(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_outline_file_is_an_error() {
        let dir = store_dir();
        assert!(run_in(dir.path(), "Nope", Some(&dir.path().join("missing.txt"))).is_err());
    }
}
