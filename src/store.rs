//! Paths and common operations for the `.mindtree/` directory.
//!
//! Each map lives in `.mindtree/maps/<id>.json` as a [`MapRecord`]. The
//! directory also holds `config.mindtree` and, while the editor runs,
//! `mindtree.log`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::map::model::MapData;
use crate::parser::config::{self, Config};

const STORE_DIR: &str = ".mindtree";

/// A named map as stored on disk. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRecord {
    pub id: String,
    pub name: String,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(flatten)]
    pub data: MapData,
}

impl MapRecord {
    pub fn node_count(&self) -> usize {
        self.data.nodes.len()
    }
}

// ---------------------------------------------------------------------------
// Locating the store
// ---------------------------------------------------------------------------

/// Walk upward from `start` to find the directory containing `.mindtree/`.
pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if store_dir(dir).join("maps").is_dir() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!("no mindtree store found. Run `mindtree init` to create one here"),
        }
    }
}

/// Walk upward from the current working directory to find the store root.
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    find_root_from(&cwd)
}

pub fn store_dir(root: &Path) -> PathBuf {
    root.join(STORE_DIR)
}

pub fn maps_dir(root: &Path) -> PathBuf {
    store_dir(root).join("maps")
}

pub fn map_path(root: &Path, id: &str) -> PathBuf {
    maps_dir(root).join(format!("{id}.json"))
}

pub fn config_path(root: &Path) -> PathBuf {
    store_dir(root).join("config.mindtree")
}

pub fn log_path(root: &Path) -> PathBuf {
    store_dir(root).join("mindtree.log")
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

/// Create `.mindtree/` under `root` with an empty map directory and the
/// default configuration.
pub fn init(root: &Path) -> Result<()> {
    if maps_dir(root).is_dir() {
        bail!(
            "a mindtree store already exists at {}",
            store_dir(root).display()
        );
    }
    fs::create_dir_all(maps_dir(root))
        .with_context(|| format!("failed to create {}", maps_dir(root).display()))?;
    let config_file = config_path(root);
    if !config_file.exists() {
        fs::write(&config_file, config::default_contents())
            .with_context(|| format!("failed to write {}", config_file.display()))?;
    }
    Ok(())
}

/// Read `config.mindtree`, falling back to defaults when it is missing.
pub fn load_config(root: &Path) -> Result<Config> {
    let path = config_path(root);
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    config::parse(&content).with_context(|| format!("invalid config in {}", path.display()))
}

pub fn save_config(root: &Path, cfg: &Config) -> Result<()> {
    let path = config_path(root);
    fs::write(&path, config::serialize(cfg))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Store `data` as a new map called `name`.
pub fn create_map(root: &Path, name: &str, data: MapData) -> Result<MapRecord> {
    let name = name.trim();
    if name.is_empty() {
        bail!("map name must not be empty");
    }
    let now = now_millis();
    let mut id_num = now;
    while map_path(root, &id_num.to_string()).exists() {
        id_num += 1;
    }
    let record = MapRecord {
        id: id_num.to_string(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
        data,
    };
    save_map(root, &record)?;
    Ok(record)
}

pub fn load_map(root: &Path, id: &str) -> Result<MapRecord> {
    let path = map_path(root, id);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid map file {}", path.display()))
}

/// Write `record` as pretty JSON, replacing any previous version.
pub fn save_map(root: &Path, record: &MapRecord) -> Result<()> {
    let path = map_path(root, &record.id);
    let json = serde_json::to_string_pretty(record)?;
    // replace atomically via a sibling temp file
    let tmp = path.with_extension("json.tmp");
    if let Err(err) = fs::write(&tmp, json + "\n").and_then(|()| fs::rename(&tmp, &path)) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("failed to save {}", path.display()));
    }
    debug!(id = %record.id, nodes = record.node_count(), "saved map");
    Ok(())
}

/// All readable maps, most recently updated first. Unreadable files are
/// logged and skipped.
pub fn list_maps(root: &Path) -> Result<Vec<MapRecord>> {
    let dir = maps_dir(root);
    let mut records = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match load_map(root, id) {
            Ok(record) => records.push(record),
            Err(err) => warn!(path = %path.display(), "skipping unreadable map: {err:#}"),
        }
    }
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(records)
}

/// Maps whose name contains `query`, ignoring case. An empty query matches
/// everything.
pub fn search_maps<'a>(maps: &'a [MapRecord], query: &str) -> Vec<&'a MapRecord> {
    let needle = query.trim().to_lowercase();
    maps.iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .collect()
}

/// Find a map by exact id, or else by a case-insensitive name that only
/// one map carries.
pub fn resolve_map(root: &Path, key: &str) -> Result<MapRecord> {
    let maps = list_maps(root)?;
    if let Some(record) = maps.iter().find(|m| m.id == key) {
        return Ok(record.clone());
    }
    let wanted = key.trim().to_lowercase();
    let named: Vec<&MapRecord> = maps
        .iter()
        .filter(|m| m.name.to_lowercase() == wanted)
        .collect();
    match named.as_slice() {
        [record] => Ok((*record).clone()),
        [] => bail!("no map named `{}`. Run `mindtree list` to see available maps", key),
        several => {
            let ids: Vec<&str> = several.iter().map(|m| m.id.as_str()).collect();
            bail!(
                "`{}` matches {} maps ({}); use the id instead",
                key,
                several.len(),
                ids.join(", ")
            )
        }
    }
}

/// Give the map `key` resolves to a new name. The root topic keeps its
/// label.
pub fn rename_map(root: &Path, key: &str, name: &str) -> Result<MapRecord> {
    let name = name.trim();
    if name.is_empty() {
        bail!("map name must not be empty");
    }
    let mut record = resolve_map(root, key)?;
    record.name = name.to_string();
    record.updated_at = now_millis();
    save_map(root, &record)?;
    Ok(record)
}

/// Remove the map `key` resolves to and return what was removed.
pub fn delete_map(root: &Path, key: &str) -> Result<MapRecord> {
    let record = resolve_map(root, key)?;
    let path = map_path(root, &record.id);
    fs::remove_file(&path).with_context(|| format!("failed to delete {}", path.display()))?;
    debug!(id = %record.id, "deleted map");
    Ok(record)
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
