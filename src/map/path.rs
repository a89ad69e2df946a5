//! Hierarchical topic paths (`1`, `1.2`, `1.2.3`) and the addressing rules
//! built on them.
//!
//! A path encodes a node's position in the tree: the root is `1`, and every
//! child appends one positive segment to its parent's path. Segment numbers
//! are never reused after a deletion, so a path is a stable identity for the
//! lifetime of the node.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::model::Node;

/// Why a string could not be read as a [`TopicPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("topic path is empty")]
    Empty,
    #[error("topic path `{path}` has an empty segment")]
    EmptySegment { path: String },
    #[error("topic path `{path}` has a non-numeric segment `{segment}`")]
    NotNumeric { path: String, segment: String },
    #[error("topic path `{path}` has a zero segment")]
    Zero { path: String },
}

/// A dotted hierarchical address such as `1.2.3`.
///
/// Always holds at least one segment and every segment is `>= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicPath(Vec<u32>);

impl TopicPath {
    /// The root path, `1`.
    pub fn root() -> Self {
        Self(vec![1])
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Number of dots in the path; equals the node's level.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// The trailing segment.
    pub fn last(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    /// The enclosing path, or `None` for a single-segment path.
    pub fn parent(&self) -> Option<TopicPath> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// `self` with `segment` appended. `segment` is raised to 1 if zero.
    pub fn child(&self, segment: u32) -> TopicPath {
        let mut segments = self.0.clone();
        segments.push(segment.max(1));
        Self(segments)
    }

    /// `self` with the trailing segment replaced.
    pub fn with_last(&self, segment: u32) -> TopicPath {
        let mut segments = self.0.clone();
        let last = segments.len() - 1;
        segments[last] = segment.max(1);
        Self(segments)
    }

    /// True when `self` sits exactly one level below `parent`.
    pub fn is_child_of(&self, parent: &TopicPath) -> bool {
        self.0.len() == parent.0.len() + 1 && self.0.starts_with(&parent.0)
    }

    /// True when `ancestor` is a strict dotted prefix of `self`.
    pub fn is_descendant_of(&self, ancestor: &TopicPath) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for TopicPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: trimmed.to_string(),
                });
            }
            let value: u32 = part.parse().map_err(|_| PathError::NotNumeric {
                path: trimmed.to_string(),
                segment: part.to_string(),
            })?;
            if value == 0 {
                return Err(PathError::Zero {
                    path: trimmed.to_string(),
                });
            }
            segments.push(value);
        }
        Ok(Self(segments))
    }
}

impl TryFrom<String> for TopicPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TopicPath> for String {
    fn from(path: TopicPath) -> Self {
        path.to_string()
    }
}

impl PartialOrd for TopicPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TopicPath {
    /// Numeric, segment-wise: `1.2` < `1.10`, and a parent sorts before its
    /// descendants.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// The path a new child of `parent` receives.
///
/// Only direct children count. The trailing segments are compared
/// numerically and the result is one past the maximum, so gaps left by
/// deletions are never refilled. `None` once the maximum is `u32::MAX`.
pub fn next_child_path<'a, I>(parent: &TopicPath, existing: I) -> Option<TopicPath>
where
    I: IntoIterator<Item = &'a TopicPath>,
{
    let max = existing
        .into_iter()
        .filter(|path| path.is_child_of(parent))
        .map(TopicPath::last)
        .max()
        .unwrap_or(0);
    max.checked_add(1).map(|segment| parent.child(segment))
}

/// Literal increment of the trailing segment (`1.2.3` → `1.2.4`).
///
/// `None` for the root, which has no siblings, and for a trailing segment
/// of `u32::MAX`. The result may collide with an existing sibling; see
/// [`next_free_sibling_path`].
pub fn next_sibling_path(path: &TopicPath) -> Option<TopicPath> {
    if path.is_root() {
        return None;
    }
    let segment = path.last().checked_add(1)?;
    Some(path.with_last(segment))
}

/// The next unused slot among `path`'s siblings, using the same rule as
/// [`next_child_path`] applied to `path`'s parent.
pub fn next_free_sibling_path<'a, I>(path: &TopicPath, existing: I) -> Option<TopicPath>
where
    I: IntoIterator<Item = &'a TopicPath>,
{
    let parent = path.parent()?;
    next_child_path(&parent, existing)
}

/// Render the tree as indented text, four spaces per level, children in
/// ascending path order. Nodes that cannot be reached from the root are
/// left out.
pub fn outline_text(nodes: &[Node]) -> String {
    let Some(root) = nodes.iter().find(|n| n.is_root) else {
        return String::new();
    };

    let mut children: HashMap<&str, Vec<&Node>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(node);
        }
    }
    for list in children.values_mut() {
        list.sort_by(|a, b| a.path.cmp(&b.path));
    }

    let mut out = String::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        out.push_str(&"    ".repeat(depth));
        out.push_str(&node.label);
        out.push('\n');
        if let Some(list) = children.get(node.id.as_str()) {
            for child in list.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    out
}
