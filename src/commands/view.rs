//! `mindtree view` / `mindtree setup` — open the interactive editor.

use anyhow::Result;

use crate::tui::canvas::{self, MapSource};

/// Open `map` (id or name), the most recent map when `None`, or the built-in
/// sample with `demo`.
pub fn run(map: Option<&str>, demo: bool) -> Result<()> {
    canvas::run(source(map, demo), false)
}

/// Open the editor with the settings panel in front.
pub fn run_setup(demo: bool) -> Result<()> {
    canvas::run(source(None, demo), true)
}

fn source(map: Option<&str>, demo: bool) -> MapSource {
    if demo {
        MapSource::Demo
    } else {
        MapSource::Stored(map.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_wins_over_map_key() {
        assert_eq!(source(Some("ideas"), true), MapSource::Demo);
        assert_eq!(
            source(Some("ideas"), false),
            MapSource::Stored(Some("ideas".to_string()))
        );
        assert_eq!(source(None, false), MapSource::Stored(None));
    }
}
