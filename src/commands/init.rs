//! `mindtree init` — create a map store in the current directory.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::store;

/// Entry point called from `main`.
pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    store::init(root)?;
    println!("  {} .mindtree/maps/", "Created".green().bold());
    println!("  {} .mindtree/config.mindtree", "Created".green().bold());
    println!(
        "  {} {}",
        "Next".cyan().bold(),
        "mindtree new \"<name>\"".dark_grey()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn creates_store_directory() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(dir.path().join(".mindtree/maps").is_dir());
    }

    #[test]
    fn creates_default_config() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join(".mindtree/config.mindtree")).unwrap();
        assert!(content.contains("sibling_slot: next-free"));
        assert!(content.contains("default_view: diagram"));
    }

    #[test]
    fn keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".mindtree")).unwrap();
        fs::write(dir.path().join(".mindtree/config.mindtree"), "vertical_spacing: 60\n").unwrap();
        run_in(dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join(".mindtree/config.mindtree")).unwrap();
        assert_eq!(content, "vertical_spacing: 60\n");
    }

    #[test]
    fn error_if_already_initialised() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(run_in(dir.path()).is_err());
    }
}
