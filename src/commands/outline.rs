//! `mindtree outline` — print a map as indented text.
//!
//! The output is plain (no color) so it can be piped into a file and read
//! back with `mindtree new --from-outline`.

use std::path::Path;

use anyhow::Result;

use crate::commands::editing::OpenMap;
use crate::parser::outline;
use crate::store;

pub fn run(map: &str) -> Result<()> {
    let root = store::find_root()?;
    print!("{}", render(&root, map)?);
    Ok(())
}

pub fn render(root: &Path, map: &str) -> Result<String> {
    let open = OpenMap::open(root, map)?;
    Ok(outline::serialize(&outline::from_map(&open.map)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn renders_what_was_imported() {
        let dir = TempDir::new().unwrap();
        store::init(dir.path()).unwrap();
        let text = "Home\n    Garden\n        Beds\n    Garage\n";
        let file = dir.path().join("home.txt");
        fs::write(&file, text).unwrap();
        new::run_in(dir.path(), "Home", Some(&file)).unwrap();

        assert_eq!(render(dir.path(), "home").unwrap(), text);
    }
}
