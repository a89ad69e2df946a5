//! Shared plumbing for commands that read or edit a stored map.

use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::style::Stylize;

use crate::map::model::Node;
use crate::map::session::{LoadWarning, MindMap};
use crate::store::{self, MapRecord};

/// A stored map opened as an editing session.
#[derive(Debug)]
pub struct OpenMap {
    pub root: PathBuf,
    /// Header fields of the record; `data` is moved into `map`.
    pub record: MapRecord,
    pub map: MindMap,
}

impl OpenMap {
    /// Resolve `key` (id or name) and open it with the store's settings.
    pub fn open(root: &Path, key: &str) -> Result<Self> {
        let config = store::load_config(root)?;
        let mut record = store::resolve_map(root, key)?;
        let data = std::mem::take(&mut record.data);
        let (map, warnings) = MindMap::open(data, config.settings());
        print_load_warnings(&warnings);
        Ok(Self {
            root: root.to_path_buf(),
            record,
            map,
        })
    }

    /// Look up a node by id or path, printing a notice when it is missing.
    pub fn find_node(&self, key: &str) -> Option<&Node> {
        let node = self.map.find(key);
        if node.is_none() {
            print_skipped(&format!("no topic `{}` in {}", key, self.record.name));
        }
        node
    }

    /// Write the session back with a fresh `updatedAt`.
    pub fn save(self) -> Result<MapRecord> {
        let mut record = self.record;
        record.data = self.map.into_data();
        record.updated_at = store::now_millis();
        store::save_map(&self.root, &record)?;
        Ok(record)
    }
}

pub fn print_load_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        println!("  {} {}", "Repaired".yellow().bold(), warning);
    }
}

pub fn print_skipped(reason: &str) {
    println!("  {} {}", "Skipped".yellow().bold(), reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::model::MapData;
    use tempfile::TempDir;

    #[test]
    fn open_and_save_bump_updated_at() {
        let dir = TempDir::new().unwrap();
        store::init(dir.path()).unwrap();
        let mut created = store::create_map(dir.path(), "Trip", MapData::new()).unwrap();
        created.updated_at = 1;
        store::save_map(dir.path(), &created).unwrap();

        let open = OpenMap::open(dir.path(), "trip").unwrap();
        // empty data opens as a fresh single-root map
        assert_eq!(open.map.nodes().len(), 1);
        let saved = open.save().unwrap();
        assert!(saved.updated_at > 1);
        assert_eq!(store::load_map(dir.path(), &saved.id).unwrap().node_count(), 1);
    }

    #[test]
    fn find_node_accepts_ids_and_paths() {
        let dir = TempDir::new().unwrap();
        store::init(dir.path()).unwrap();
        store::create_map(dir.path(), "Trip", MapData::new()).unwrap();
        let open = OpenMap::open(dir.path(), "Trip").unwrap();
        let root_id = open.map.root().unwrap().id.clone();
        assert_eq!(open.find_node("1").map(|n| n.id.clone()), Some(root_id));
        assert!(open.find_node("1.9").is_none());
    }
}
