use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::map::color::Rgb;
use crate::map::path::TopicPath;

/// A point in diagram space. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Semibold,
    Bold,
}

impl FromStr for BorderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            other => Err(format!(
                "unknown border style `{other}` (expected solid | dashed | dotted)"
            )),
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "medium" => Ok(Self::Medium),
            "semibold" => Ok(Self::Semibold),
            "bold" => Ok(Self::Bold),
            other => Err(format!(
                "unknown font weight `{other}` (expected normal | medium | semibold | bold)"
            )),
        }
    }
}

impl FontWeight {
    /// Whether a terminal should render this weight in bold.
    pub fn is_heavy(self) -> bool {
        matches!(self, Self::Semibold | Self::Bold)
    }
}

/// Per-node presentation overrides. Never consulted by layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u16>,
}

impl NodeStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A topic in the map.
///
/// `position`, `branch_index` and `branch_color` are derived by layout and
/// overwritten on every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub path: TopicPath,
    /// Depth in the tree; root = 0. Always `path.depth()` in a valid map.
    pub level: usize,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_color: Option<Rgb>,
    /// `None` until layout has placed the node.
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    /// Outline view only.
    #[serde(default)]
    pub collapsed: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: TopicPath) -> Self {
        let level = path.depth();
        Self {
            id: id.into(),
            label: label.into(),
            path,
            level,
            is_root: false,
            parent_id: None,
            branch_index: None,
            branch_color: None,
            position: None,
            style: None,
            collapsed: false,
        }
    }

    /// A root node: path `1`, level 0, no parent.
    pub fn root(id: impl Into<String>, label: impl Into<String>) -> Self {
        let mut node = Self::new(id, label, TopicPath::root());
        node.is_root = true;
        node
    }
}

/// A label as stored: every control character (line breaks, tabs, escapes)
/// becomes a space and the ends are trimmed, so a label is always one line.
pub fn clean_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether an edge mirrors a parent link or was drawn by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `parent -> child`; exactly one per non-root node.
    #[default]
    Tree,
    /// User-drawn connection with no path semantics.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn tree(source: &str, target: &str) -> Self {
        Self {
            id: format!("e{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Tree,
        }
    }

    pub fn manual(source: &str, target: &str) -> Self {
        Self {
            id: format!("m{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Manual,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// The `{nodes, edges}` pair exchanged with storage and listeners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl MapData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_level_follows_path() {
        let node = Node::new("7", "Leaf", "1.3.2".parse().unwrap());
        assert_eq!(node.level, 2);
        assert!(!node.is_root);
    }

    #[test]
    fn root_node_defaults() {
        let root = Node::root("1", "Main Idea");
        assert!(root.is_root);
        assert_eq!(root.path.to_string(), "1");
        assert_eq!(root.level, 0);
        assert!(root.parent_id.is_none());
    }

    #[test]
    fn edge_ids_encode_endpoints() {
        assert_eq!(Edge::tree("1", "2").id, "e1-2");
        assert_eq!(Edge::manual("2", "3").id, "m2-3");
        assert!(Edge::tree("1", "2").touches("2"));
        assert!(!Edge::tree("1", "2").touches("3"));
    }

    #[test]
    fn json_uses_camel_case_and_string_paths() {
        let mut node = Node::new("2", "Child", "1.1".parse().unwrap());
        node.parent_id = Some("1".into());
        node.branch_color = Some(Rgb::new(56, 127, 237));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["path"], "1.1");
        assert_eq!(json["parentId"], "1");
        assert_eq!(json["branchColor"], "rgb(56, 127, 237)");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn json_rejects_malformed_paths() {
        let json = r#"{"id":"1","label":"x","path":"1..2","level":0}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn clean_label_flattens_control_characters() {
        assert_eq!(clean_label("  plain  "), "plain");
        assert_eq!(clean_label("a\nb\r\nc"), "a b  c");
        assert_eq!(clean_label("tab\there\u{1b}"), "tab here");
        assert_eq!(clean_label("\n\t"), "");
    }

    #[test]
    fn style_keywords_parse() {
        assert_eq!("Dashed".parse(), Ok(BorderStyle::Dashed));
        assert_eq!("semibold".parse(), Ok(FontWeight::Semibold));
        assert!("wavy".parse::<BorderStyle>().is_err());
        assert!(FontWeight::Bold.is_heavy());
        assert!(!FontWeight::Medium.is_heavy());
    }

    #[test]
    fn edge_kind_defaults_to_tree() {
        let json = r#"{"id":"e1-2","source":"1","target":"2"}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.kind, EdgeKind::Tree);
    }
}
