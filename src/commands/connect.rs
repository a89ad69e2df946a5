//! `mindtree connect` / `mindtree disconnect` — manual links between
//! topics. They are drawn in the diagram but never move anything.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::commands::editing::{OpenMap, print_skipped};
use crate::store;

pub fn run(map: &str, from: &str, to: &str) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map, from, to)?;
    Ok(())
}

pub fn run_disconnect(map: &str, edge: &str) -> Result<()> {
    let root = store::find_root()?;
    disconnect_in(&root, map, edge)?;
    Ok(())
}

/// Returns the new edge id.
pub fn run_in(root: &Path, map: &str, from: &str, to: &str) -> Result<Option<String>> {
    let mut open = OpenMap::open(root, map)?;
    let Some(source) = open.find_node(from).map(|n| (n.id.clone(), n.label.clone())) else {
        return Ok(None);
    };
    let Some(target) = open.find_node(to).map(|n| (n.id.clone(), n.label.clone())) else {
        return Ok(None);
    };

    let Some(edge_id) = open.map.connect(&source.0, &target.0) else {
        print_skipped("a topic cannot link to itself, and each link is drawn once");
        return Ok(None);
    };
    open.save()?;
    println!(
        "  {} {} -> {} {}",
        "Connected".green().bold(),
        source.1,
        target.1,
        format!("[{edge_id}]").dark_grey()
    );
    Ok(Some(edge_id))
}

pub fn disconnect_in(root: &Path, map: &str, edge: &str) -> Result<bool> {
    let mut open = OpenMap::open(root, map)?;
    if !open.map.disconnect(edge) {
        print_skipped(&format!("no manual link `{}`", edge));
        return Ok(false);
    }
    open.save()?;
    println!("  {} {}", "Disconnected".red().bold(), edge);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, new};
    use crate::map::model::EdgeKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        store::init(dir.path()).unwrap();
        let record = new::run_in(dir.path(), "Web", None).unwrap();
        add::run_in(dir.path(), "Web", "A", None, false).unwrap();
        add::run_in(dir.path(), "Web", "B", None, false).unwrap();
        (dir, record.id)
    }

    #[test]
    fn connect_by_path_then_disconnect() {
        let (dir, id) = setup();
        let edge = run_in(dir.path(), "Web", "1.1", "1.2").unwrap().unwrap();

        let data = store::load_map(dir.path(), &id).unwrap().data;
        let manual: Vec<_> = data
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Manual)
            .collect();
        assert_eq!(manual.len(), 1);
        assert_eq!(manual[0].id, edge);

        assert!(disconnect_in(dir.path(), "Web", &edge).unwrap());
        let data = store::load_map(dir.path(), &id).unwrap().data;
        assert!(data.edges.iter().all(|e| e.kind == EdgeKind::Tree));
    }

    #[test]
    fn refused_links_are_skipped() {
        let (dir, _) = setup();
        assert_eq!(run_in(dir.path(), "Web", "1.1", "1.1").unwrap(), None);
        assert_eq!(run_in(dir.path(), "Web", "1.1", "1.9").unwrap(), None);
        run_in(dir.path(), "Web", "1.1", "1.2").unwrap();
        assert_eq!(run_in(dir.path(), "Web", "1.1", "1.2").unwrap(), None);
    }

    #[test]
    fn tree_edges_cannot_be_disconnected() {
        let (dir, id) = setup();
        let data = store::load_map(dir.path(), &id).unwrap().data;
        let tree_edge = data.edges[0].id.clone();
        assert!(!disconnect_in(dir.path(), "Web", &tree_edge).unwrap());
    }
}
