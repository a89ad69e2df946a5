//! Tree layout: positions, branch indices and branch colors, derived purely
//! from parent links.
//!
//! The root sits at the origin. Each node's children are stacked in evenly
//! spaced rows centered on the parent's `y`, one fixed column to the right.
//! Prior positions and colors are ignored, so the same tree always lays out
//! the same way.

use std::collections::{HashMap, HashSet};

use crate::map::color::Palette;
use crate::map::model::{Node, Position};

pub const DEFAULT_HORIZONTAL_SPACING: f64 = 250.0;
pub const DEFAULT_VERTICAL_SPACING: f64 = 100.0;
pub const DEFAULT_DEPTH_LIGHTEN_STEP: f32 = 0.2;

/// Default for [`LayoutConfig::max_depth`].
pub const MAX_LAYOUT_DEPTH: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    /// Lightening per level below the branch head.
    pub depth_lighten_step: f32,
    pub palette: Palette,
    /// Deepest level that is placed. Everything below is left unplaced
    /// and reported as [`LayoutWarning::DepthLimit`].
    pub max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            depth_lighten_step: DEFAULT_DEPTH_LIGHTEN_STEP,
            palette: Palette::default(),
            max_depth: MAX_LAYOUT_DEPTH,
        }
    }
}

/// Something layout could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutWarning {
    /// No node is marked as root; nothing was laid out.
    NoRoot,
    /// Not connected to the root through parent links.
    Unreachable {
        id: String,
        parent_id: Option<String>,
    },
    /// Reachable, but below [`LayoutConfig::max_depth`]. Reported for every
    /// node of the cut subtree, never also as [`LayoutWarning::Unreachable`].
    DepthLimit { id: String },
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoot => write!(f, "map has no root node"),
            Self::Unreachable {
                id,
                parent_id: Some(parent),
            } => write!(f, "node {id} is not reachable from the root (parent {parent})"),
            Self::Unreachable { id, parent_id: None } => {
                write!(f, "node {id} has no parent and is not the root")
            }
            Self::DepthLimit { id } => write!(f, "node {id} is beyond the layout depth limit"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    pub positioned: usize,
    pub warnings: Vec<LayoutWarning>,
}

#[derive(Debug, Clone)]
pub struct LayoutOutcome {
    pub nodes: Vec<Node>,
    pub report: LayoutReport,
}

/// Lay out `nodes`, returning a new collection in the same order.
///
/// Children are visited in collection order, which is creation order for
/// maps edited through the session. The branch counter advances once per
/// level-1 node in that order.
pub fn calculate_layout(nodes: &[Node], config: &LayoutConfig) -> LayoutOutcome {
    let Some(root_idx) = nodes.iter().position(|n| n.is_root) else {
        return LayoutOutcome {
            nodes: nodes.to_vec(),
            report: LayoutReport {
                positioned: 0,
                warnings: vec![LayoutWarning::NoRoot],
            },
        };
    };

    let mut out = nodes.to_vec();
    for node in &mut out {
        node.position = None;
        node.branch_index = None;
        node.branch_color = None;
    }

    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(idx);
        }
    }

    let mut warnings = Vec::new();
    let mut visited: HashSet<usize> = HashSet::from([root_idx]);
    let mut branch_counter = 0usize;
    out[root_idx].position = Some(Position::ORIGIN);

    // (node index, depth). Depth-first pre-order; a node's children are all
    // placed when the node is popped.
    let mut stack = vec![(root_idx, 0usize)];
    while let Some((parent_idx, depth)) = stack.pop() {
        let Some(kids) = children.get(nodes[parent_idx].id.as_str()) else {
            continue;
        };
        let kids = kids
            .iter()
            .copied()
            .filter(|idx| !visited.contains(idx))
            .collect::<Vec<_>>();
        if kids.is_empty() {
            continue;
        }

        let child_depth = depth + 1;
        if child_depth > config.max_depth {
            // the whole subtree below the cut goes unplaced
            let mut cut = kids.into_iter().rev().collect::<Vec<_>>();
            while let Some(idx) = cut.pop() {
                if !visited.insert(idx) {
                    continue;
                }
                warnings.push(LayoutWarning::DepthLimit {
                    id: nodes[idx].id.clone(),
                });
                if let Some(grandkids) = children.get(nodes[idx].id.as_str()) {
                    cut.extend(grandkids.iter().rev());
                }
            }
            continue;
        }

        let parent_pos = out[parent_idx].position.unwrap_or(Position::ORIGIN);
        let parent_color = out[parent_idx].branch_color;
        let parent_branch = out[parent_idx].branch_index;
        let spacing = config.vertical_spacing;
        let start_y = parent_pos.y - (kids.len() - 1) as f64 * spacing / 2.0;

        for (i, &idx) in kids.iter().enumerate() {
            visited.insert(idx);
            let child = &mut out[idx];
            child.position = Some(Position::new(
                parent_pos.x + config.horizontal_spacing,
                start_y + i as f64 * spacing,
            ));
            if child_depth == 1 {
                child.branch_index = Some(branch_counter);
                child.branch_color = Some(config.palette.color_for_branch(branch_counter));
                branch_counter += 1;
            } else {
                let base = parent_color.unwrap_or_else(|| config.palette.color_for_branch(0));
                let factor = (child_depth - 1) as f32 * config.depth_lighten_step;
                child.branch_index = parent_branch;
                child.branch_color = Some(base.lighten(factor));
            }
        }

        for &idx in kids.iter().rev() {
            stack.push((idx, child_depth));
        }
    }

    for (idx, node) in nodes.iter().enumerate() {
        if !visited.contains(&idx) {
            warnings.push(LayoutWarning::Unreachable {
                id: node.id.clone(),
                parent_id: node.parent_id.clone(),
            });
        }
    }

    let positioned = out.iter().filter(|n| n.position.is_some()).count();
    LayoutOutcome {
        nodes: out,
        report: LayoutReport {
            positioned,
            warnings,
        },
    }
}
