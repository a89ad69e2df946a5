//! `mindtree style` — set or clear a topic's presentation overrides.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::commands::editing::{OpenMap, print_skipped};
use crate::map::color::Rgb;
use crate::map::model::{BorderStyle, FontWeight, NodeStyle};
use crate::store;

/// Overrides given on the command line. Unset fields keep their current
/// value unless `clear` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleChange {
    pub background: Option<Rgb>,
    pub border: Option<Rgb>,
    pub border_style: Option<BorderStyle>,
    pub text: Option<Rgb>,
    pub weight: Option<FontWeight>,
    pub clear: bool,
}

impl StyleChange {
    fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    /// Fold this change into `current`.
    pub fn apply(&self, current: Option<&NodeStyle>) -> NodeStyle {
        let mut style = if self.clear {
            NodeStyle::default()
        } else {
            current.cloned().unwrap_or_default()
        };
        if self.background.is_some() {
            style.background_color = self.background;
        }
        if self.border.is_some() {
            style.border_color = self.border;
        }
        if self.border_style.is_some() {
            style.border_style = self.border_style;
        }
        if self.text.is_some() {
            style.text_color = self.text;
        }
        if self.weight.is_some() {
            style.font_weight = self.weight;
        }
        style
    }
}

pub fn run(map: &str, node: &str, change: &StyleChange) -> Result<()> {
    let root = store::find_root()?;
    run_in(&root, map, node, change)?;
    Ok(())
}

pub fn run_in(root: &Path, map: &str, node: &str, change: &StyleChange) -> Result<bool> {
    if change.is_noop() {
        bail!("nothing to change: pass --bg, --border, --border-style, --text, --weight or --clear");
    }
    let mut open = OpenMap::open(root, map)?;
    let Some((id, label, style)) = open
        .find_node(node)
        .map(|n| (n.id.clone(), n.label.clone(), change.apply(n.style.as_ref())))
    else {
        return Ok(false);
    };

    let cleared = style.is_empty();
    if !open.map.set_style(&id, Some(style)) {
        print_skipped("style unchanged");
        return Ok(false);
    }
    open.save()?;
    let verb = if cleared { "Cleared" } else { "Styled" };
    println!("  {} {}", verb.green().bold(), label);
    Ok(true)
}
