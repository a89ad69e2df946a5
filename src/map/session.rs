//! The editing session for one open map.
//!
//! [`MindMap`] owns the node and edge lists and is the only thing that
//! mutates them. Every successful mutation is committed as a unit: the
//! lookup index is rebuilt, layout is recomputed, and then the change
//! listener (if any) sees the full, laid-out [`MapData`]. Invalid requests
//! (missing ids, deleting the root, a sibling for the root) are no-ops that
//! return `None`/`false` and never reach the listener.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::map::layout::{LayoutConfig, LayoutReport, calculate_layout};
use crate::map::model::{Edge, EdgeKind, MapData, Node, NodeStyle, clean_label};
use crate::map::path::{
    TopicPath, next_child_path, next_free_sibling_path, next_sibling_path, outline_text,
};

/// Label given to the root of a map created from nothing.
pub const DEFAULT_ROOT_LABEL: &str = "Main Idea";

/// Where a new node goes relative to the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Child,
    Sibling,
}

/// How a sibling's trailing path segment is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiblingSlot {
    /// One past the highest segment among the parent's children.
    #[default]
    NextFree,
    /// The selected node's segment plus one; refused if that slot is taken.
    Increment,
}

impl SiblingSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NextFree => "next-free",
            Self::Increment => "increment",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub sibling_slot: SiblingSlot,
}

/// Problems found in data handed to [`MindMap::open`].
///
/// None of these are fatal; the session repairs what it can and lays out
/// the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// No root node; a fresh single-root map was used instead.
    MissingRoot,
    /// A second node claimed to be the root and was demoted.
    ExtraRoot { id: String },
    /// The root's path or parent link was reset.
    RootRepaired { id: String },
    /// A node id appeared more than once; later copies were dropped.
    DuplicateId { id: String },
    /// Two nodes share a path.
    DuplicatePath { id: String, path: String },
    /// A non-root node with no parent link.
    Detached { id: String },
    /// The parent link names a node that does not exist.
    MissingParent { id: String, parent_id: String },
    /// No node carries the parent part of this node's path.
    MissingParentPath { id: String, path: String },
    /// The node's path does not extend its parent's path.
    PathMismatch {
        id: String,
        path: String,
        parent_path: String,
    },
    /// Stored level disagreed with the path and was re-derived.
    LevelMismatch { id: String, level: usize, path: String },
    /// A label held line breaks or other control characters; they were
    /// replaced with spaces.
    LabelCleaned { id: String },
    /// An edge touched a missing node and was dropped.
    DanglingEdge { id: String },
    /// A parent link had no matching tree edge; one was added.
    MissingTreeEdge { id: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "no root node; started a fresh map"),
            Self::ExtraRoot { id } => write!(f, "node {id} was a second root and was demoted"),
            Self::RootRepaired { id } => write!(f, "root {id} had a bad path or parent; reset"),
            Self::DuplicateId { id } => write!(f, "duplicate node id {id}; later copy dropped"),
            Self::DuplicatePath { id, path } => {
                write!(f, "node {id} reuses path {path}")
            }
            Self::Detached { id } => write!(f, "node {id} has no parent"),
            Self::MissingParent { id, parent_id } => {
                write!(f, "node {id} points at missing parent {parent_id}")
            }
            Self::MissingParentPath { id, path } => {
                write!(f, "node {id} has path {path} but its parent path is absent")
            }
            Self::PathMismatch {
                id,
                path,
                parent_path,
            } => write!(
                f,
                "node {id} has path {path}, which is not a child of {parent_path}"
            ),
            Self::LevelMismatch { id, level, path } => {
                write!(f, "node {id} had level {level} for path {path}; re-derived")
            }
            Self::LabelCleaned { id } => {
                write!(f, "node {id} had control characters in its label; replaced")
            }
            Self::DanglingEdge { id } => write!(f, "edge {id} touches a missing node; dropped"),
            Self::MissingTreeEdge { id } => write!(f, "node {id} had no parent edge; added"),
        }
    }
}

type Listener = Box<dyn FnMut(&MapData)>;

#[derive(Debug, Default)]
struct MapIndex {
    by_id: HashMap<String, usize>,
    by_path: HashMap<TopicPath, usize>,
    /// Parent id → child slots, in path order.
    children: HashMap<String, Vec<usize>>,
}

impl MapIndex {
    fn build(nodes: &[Node]) -> Self {
        let mut index = Self::default();
        for (slot, node) in nodes.iter().enumerate() {
            index.by_id.entry(node.id.clone()).or_insert(slot);
            index.by_path.entry(node.path.clone()).or_insert(slot);
            if let Some(parent) = &node.parent_id {
                index.children.entry(parent.clone()).or_default().push(slot);
            }
        }
        for slots in index.children.values_mut() {
            slots.sort_by(|a, b| nodes[*a].path.cmp(&nodes[*b].path));
        }
        index
    }
}

/// One open map.
pub struct MindMap {
    data: MapData,
    index: MapIndex,
    settings: Settings,
    report: LayoutReport,
    listener: Option<Listener>,
}

impl fmt::Debug for MindMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MindMap")
            .field("data", &self.data)
            .field("settings", &self.settings)
            .field("report", &self.report)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl MindMap {
    /// A fresh map holding only a root labelled `root_label`.
    pub fn new(root_label: &str, settings: Settings) -> Self {
        let mut map = Self::empty(settings);
        map.add_node(None, root_label, Placement::Child);
        map
    }

    fn empty(settings: Settings) -> Self {
        Self {
            data: MapData::new(),
            index: MapIndex::default(),
            settings,
            report: LayoutReport::default(),
            listener: None,
        }
    }

    /// Adopt `data` from storage.
    ///
    /// Consistent trees are taken as they are. Data without a root yields a
    /// fresh map. Anything else that looks wrong is repaired where that is
    /// unambiguous and reported either way.
    pub fn open(data: MapData, settings: Settings) -> (Self, Vec<LoadWarning>) {
        let mut warnings = Vec::new();
        let MapData { nodes, edges } = data;

        let mut seen = HashSet::new();
        let mut nodes = nodes
            .into_iter()
            .filter(|node| {
                let fresh = seen.insert(node.id.clone());
                if !fresh {
                    warnings.push(LoadWarning::DuplicateId {
                        id: node.id.clone(),
                    });
                }
                fresh
            })
            .collect::<Vec<_>>();

        let Some(root_slot) = nodes.iter().position(|n| n.is_root) else {
            warnings.push(LoadWarning::MissingRoot);
            report_load_warnings(&warnings);
            return (Self::new(DEFAULT_ROOT_LABEL, settings), warnings);
        };

        for (slot, node) in nodes.iter_mut().enumerate() {
            if node.is_root && slot != root_slot {
                node.is_root = false;
                warnings.push(LoadWarning::ExtraRoot {
                    id: node.id.clone(),
                });
            }
        }
        {
            let root = &mut nodes[root_slot];
            if !root.path.is_root() || root.parent_id.is_some() || root.level != 0 {
                root.path = TopicPath::root();
                root.parent_id = None;
                root.level = 0;
                warnings.push(LoadWarning::RootRepaired {
                    id: root.id.clone(),
                });
            }
        }

        let path_by_id: HashMap<String, TopicPath> = nodes
            .iter()
            .map(|n| (n.id.clone(), n.path.clone()))
            .collect();
        let mut seen_paths = HashSet::new();
        for node in nodes.iter_mut() {
            if !seen_paths.insert(node.path.clone()) {
                warnings.push(LoadWarning::DuplicatePath {
                    id: node.id.clone(),
                    path: node.path.to_string(),
                });
            }
            if node.label.chars().any(char::is_control) {
                warnings.push(LoadWarning::LabelCleaned {
                    id: node.id.clone(),
                });
                node.label = clean_label(&node.label);
            }
            if node.is_root {
                continue;
            }
            if node.level != node.path.depth() {
                warnings.push(LoadWarning::LevelMismatch {
                    id: node.id.clone(),
                    level: node.level,
                    path: node.path.to_string(),
                });
                node.level = node.path.depth();
            }
            match node.parent_id.as_deref() {
                None => warnings.push(LoadWarning::Detached {
                    id: node.id.clone(),
                }),
                Some(parent) => match path_by_id.get(parent) {
                    None => warnings.push(LoadWarning::MissingParent {
                        id: node.id.clone(),
                        parent_id: parent.to_string(),
                    }),
                    Some(parent_path) if !node.path.is_child_of(parent_path) => {
                        warnings.push(LoadWarning::PathMismatch {
                            id: node.id.clone(),
                            path: node.path.to_string(),
                            parent_path: parent_path.to_string(),
                        })
                    }
                    Some(_) => {}
                },
            }
        }
        let all_paths: HashSet<&TopicPath> = path_by_id.values().collect();
        for node in &nodes {
            if let Some(parent_path) = node.path.parent()
                && !all_paths.contains(&parent_path)
            {
                warnings.push(LoadWarning::MissingParentPath {
                    id: node.id.clone(),
                    path: node.path.to_string(),
                });
            }
        }

        let mut edges = edges
            .into_iter()
            .filter(|edge| {
                let ok = path_by_id.contains_key(&edge.source)
                    && path_by_id.contains_key(&edge.target);
                if !ok {
                    warnings.push(LoadWarning::DanglingEdge {
                        id: edge.id.clone(),
                    });
                }
                ok
            })
            .collect::<Vec<_>>();
        for node in &nodes {
            let Some(parent) = node.parent_id.as_deref() else {
                continue;
            };
            if node.is_root || !path_by_id.contains_key(parent) {
                continue;
            }
            let has_edge = edges.iter().any(|e| {
                e.kind == EdgeKind::Tree && e.source == parent && e.target == node.id
            });
            if !has_edge {
                edges.push(Edge::tree(parent, &node.id));
                warnings.push(LoadWarning::MissingTreeEdge {
                    id: node.id.clone(),
                });
            }
        }

        report_load_warnings(&warnings);
        let mut map = Self::empty(settings);
        map.data = MapData { nodes, edges };
        map.recompute();
        (map, warnings)
    }

    // -----------------------------------------------------------------------
    // Listener
    // -----------------------------------------------------------------------

    /// Register the change listener, replacing any previous one. It is called
    /// once per committed mutation, after layout.
    pub fn set_listener(&mut self, listener: impl FnMut(&MapData) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn data(&self) -> &MapData {
        &self.data
    }

    pub fn into_data(self) -> MapData {
        self.data
    }

    pub fn nodes(&self) -> &[Node] {
        &self.data.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.data.edges
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Result of the most recent layout pass.
    pub fn layout_report(&self) -> &LayoutReport {
        &self.report
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.by_id.get(id).map(|&slot| &self.data.nodes[slot])
    }

    pub fn node_by_path(&self, path: &TopicPath) -> Option<&Node> {
        self.index.by_path.get(path).map(|&slot| &self.data.nodes[slot])
    }

    /// Look a node up by id, falling back to reading `key` as a path.
    pub fn find(&self, key: &str) -> Option<&Node> {
        self.node(key).or_else(|| {
            key.parse::<TopicPath>()
                .ok()
                .and_then(|path| self.node_by_path(&path))
        })
    }

    pub fn root(&self) -> Option<&Node> {
        self.data.root()
    }

    /// Direct children of `id`, in path order.
    pub fn children(&self, id: &str) -> Vec<&Node> {
        self.index
            .children
            .get(id)
            .map(|slots| slots.iter().map(|&s| &self.data.nodes[s]).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.index.children.get(id).is_some_and(|s| !s.is_empty())
    }

    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        self.node(id)?.parent_id.as_deref().and_then(|p| self.node(p))
    }

    /// Indented text rendering of the whole tree.
    pub fn outline_text(&self) -> String {
        outline_text(&self.data.nodes)
    }

    /// Nodes in outline order with their depth. Descendants of collapsed
    /// nodes are skipped when `respect_collapsed` is set.
    pub fn outline_rows(&self, respect_collapsed: bool) -> Vec<(&Node, usize)> {
        let mut rows = Vec::new();
        let Some(root) = self.root() else {
            return rows;
        };
        let mut visited = HashSet::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node.id.as_str()) {
                continue;
            }
            rows.push((node, depth));
            if respect_collapsed && node.collapsed {
                continue;
            }
            for child in self.children(&node.id).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        rows
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a node next to `anchor_id`.
    ///
    /// `None` as the anchor creates the root and is only accepted while the
    /// map is empty. The label is stored through [`clean_label`]. Returns the
    /// new node's id, or `None` when the anchor is invalid or its child
    /// numbers are exhausted.
    pub fn add_node(
        &mut self,
        anchor_id: Option<&str>,
        label: &str,
        placement: Placement,
    ) -> Option<String> {
        let label = clean_label(label);
        let label = label.as_str();
        let Some(anchor_id) = anchor_id else {
            if !self.data.nodes.is_empty() {
                debug!("ignoring add without anchor: map already has a root");
                return None;
            }
            let id = self.next_node_id();
            self.data.nodes.push(Node::root(id.clone(), label));
            self.commit();
            return Some(id);
        };

        let Some(anchor) = self.node(anchor_id) else {
            debug!(anchor = anchor_id, "ignoring add: anchor not found");
            return None;
        };
        let paths = self.data.nodes.iter().map(|n| &n.path);
        let (path, parent_id, level) = match placement {
            Placement::Child => {
                let Some(path) = next_child_path(&anchor.path, paths) else {
                    debug!(anchor = anchor_id, "ignoring add: child numbers exhausted");
                    return None;
                };
                (path, anchor.id.clone(), anchor.level + 1)
            }
            Placement::Sibling => {
                let Some(parent_id) = anchor.parent_id.clone() else {
                    debug!(anchor = anchor_id, "ignoring add: the root has no siblings");
                    return None;
                };
                let slot = match self.settings.sibling_slot {
                    SiblingSlot::NextFree => next_free_sibling_path(&anchor.path, paths),
                    SiblingSlot::Increment => next_sibling_path(&anchor.path)
                        .filter(|path| !self.index.by_path.contains_key(path)),
                };
                let Some(path) = slot else {
                    debug!(anchor = anchor_id, "ignoring add: no free sibling slot");
                    return None;
                };
                (path, parent_id, anchor.level)
            }
        };

        let id = self.next_node_id();
        let mut node = Node::new(id.clone(), label, path);
        node.level = level;
        node.parent_id = Some(parent_id.clone());
        debug!(id = %id, path = %node.path, "adding node");
        self.data.nodes.push(node);
        self.data.edges.push(Edge::tree(&parent_id, &id));
        self.commit();
        Some(id)
    }

    pub fn add_child(&mut self, parent_id: &str, label: &str) -> Option<String> {
        self.add_node(Some(parent_id), label, Placement::Child)
    }

    pub fn add_sibling(&mut self, node_id: &str, label: &str) -> Option<String> {
        self.add_node(Some(node_id), label, Placement::Sibling)
    }

    /// Delete `id` and every node below it by path, together with all edges
    /// touching them. Returns the removed ids in collection order.
    pub fn delete_node(&mut self, id: &str) -> Option<Vec<String>> {
        let Some(node) = self.node(id) else {
            debug!(id, "ignoring delete: node not found");
            return None;
        };
        if node.is_root {
            debug!(id, "ignoring delete: the root cannot be deleted");
            return None;
        }
        let path = node.path.clone();
        let removed = self
            .data
            .nodes
            .iter()
            .filter(|n| n.id == id || n.path.is_descendant_of(&path))
            .map(|n| n.id.clone())
            .collect::<Vec<_>>();
        let closed: HashSet<&str> = removed.iter().map(String::as_str).collect();

        self.data.nodes.retain(|n| !closed.contains(n.id.as_str()));
        self.data
            .edges
            .retain(|e| !closed.contains(e.source.as_str()) && !closed.contains(e.target.as_str()));
        debug!(id, count = removed.len(), "deleted subtree");
        self.commit();
        Some(removed)
    }

    /// Draw a manual edge. Refused for missing endpoints, self-loops, and
    /// pairs that are already connected in that direction.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        if source == target || self.node(source).is_none() || self.node(target).is_none() {
            debug!(source, target, "ignoring connect");
            return None;
        }
        if self
            .data
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            debug!(source, target, "ignoring connect: edge exists");
            return None;
        }
        let edge = Edge::manual(source, target);
        let id = edge.id.clone();
        self.data.edges.push(edge);
        self.commit();
        Some(id)
    }

    /// Remove a manual edge. Tree edges follow their nodes and are not
    /// removable on their own.
    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        let Some(pos) = self
            .data
            .edges
            .iter()
            .position(|e| e.id == edge_id && e.kind == EdgeKind::Manual)
        else {
            debug!(edge_id, "ignoring disconnect");
            return false;
        };
        self.data.edges.remove(pos);
        self.commit();
        true
    }

    /// Relabel `id`; the label is stored through [`clean_label`]. False when
    /// the node is missing or the label would not change.
    pub fn rename_node(&mut self, id: &str, label: &str) -> bool {
        let Some(&slot) = self.index.by_id.get(id) else {
            debug!(id, "ignoring rename: node not found");
            return false;
        };
        let label = clean_label(label);
        if self.data.nodes[slot].label == label {
            return false;
        }
        self.data.nodes[slot].label = label;
        self.commit();
        true
    }

    /// Replace a node's style overrides. An empty style clears them.
    pub fn set_style(&mut self, id: &str, style: Option<NodeStyle>) -> bool {
        let Some(&slot) = self.index.by_id.get(id) else {
            debug!(id, "ignoring style change: node not found");
            return false;
        };
        self.data.nodes[slot].style = style.filter(|s| !s.is_empty());
        self.commit();
        true
    }

    /// Flip the outline-only collapsed flag.
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        let Some(&slot) = self.index.by_id.get(id) else {
            return false;
        };
        let node = &mut self.data.nodes[slot];
        node.collapsed = !node.collapsed;
        self.commit();
        true
    }

    /// Swap settings and lay the map out again.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.commit();
    }

    /// Recompute layout and notify, without a structural change.
    pub fn relayout(&mut self) {
        self.commit();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn commit(&mut self) {
        self.recompute();
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.data);
        }
    }

    fn recompute(&mut self) {
        let outcome = calculate_layout(&self.data.nodes, &self.settings.layout);
        for warning in &outcome.report.warnings {
            warn!("layout: {warning}");
        }
        self.data.nodes = outcome.nodes;
        self.report = outcome.report;
        self.index = MapIndex::build(&self.data.nodes);
    }

    /// One past the largest numeric id in use. If that would overflow, the
    /// smallest unused number instead, which always exists below
    /// `nodes.len() + 2`.
    fn next_node_id(&self) -> String {
        let max = self
            .data
            .nodes
            .iter()
            .filter_map(|n| n.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        if let Some(next) = max.checked_add(1)
            && !self.index.by_id.contains_key(&next.to_string())
        {
            return next.to_string();
        }
        (1..)
            .map(|n: u64| n.to_string())
            .find(|id| !self.index.by_id.contains_key(id))
            .unwrap_or_default()
    }
}

fn report_load_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        warn!("load: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::map::model::Position;

    fn paths(map: &MindMap) -> Vec<String> {
        let mut out = map
            .nodes()
            .iter()
            .map(|n| n.path.clone())
            .collect::<Vec<_>>();
        out.sort();
        out.into_iter().map(|p| p.to_string()).collect()
    }

    fn id_at(map: &MindMap, path: &str) -> String {
        map.node_by_path(&path.parse().unwrap())
            .expect("path present")
            .id
            .clone()
    }

    fn assert_invariants(map: &MindMap) {
        let roots = map.nodes().iter().filter(|n| n.is_root).count();
        assert_eq!(roots, 1, "exactly one root");
        for node in map.nodes() {
            assert_eq!(node.level, node.path.to_string().matches('.').count());
            if node.is_root {
                continue;
            }
            let parent = map.parent_of(&node.id).expect("parent exists");
            assert!(node.path.is_child_of(&parent.path));
            let incoming = map
                .edges()
                .iter()
                .filter(|e| e.kind == EdgeKind::Tree && e.target == node.id)
                .collect::<Vec<_>>();
            assert_eq!(incoming.len(), 1);
            assert_eq!(incoming[0].source, parent.id);
        }
        for node in map.nodes() {
            let segments = map
                .children(&node.id)
                .iter()
                .map(|c| c.path.last())
                .collect::<HashSet<_>>();
            assert_eq!(segments.len(), map.children(&node.id).len());
        }
    }

    #[test]
    fn new_map_has_single_root() {
        let map = MindMap::new("Main Idea", Settings::default());
        let root = map.root().unwrap();
        assert_eq!(root.id, "1");
        assert_eq!(root.path.to_string(), "1");
        assert_eq!(root.position, Some(Position::ORIGIN));
        assert!(map.edges().is_empty());
    }

    #[test]
    fn editing_scenario() {
        let mut map = MindMap::new("Main Idea", Settings::default());
        let a = map.add_child("1", "A").unwrap();
        assert_eq!(map.node(&a).unwrap().path.to_string(), "1.1");
        let b = map.add_sibling(&a, "B").unwrap();
        assert_eq!(map.node(&b).unwrap().path.to_string(), "1.2");
        let a1 = map.add_child(&a, "A1").unwrap();
        assert_eq!(map.node(&a1).unwrap().path.to_string(), "1.1.1");
        assert_invariants(&map);

        let removed = map.delete_node(&a).unwrap();
        assert_eq!(removed, vec![a.clone(), a1.clone()]);
        assert_eq!(paths(&map), vec!["1", "1.2"]);
        assert_eq!(map.edges().len(), 1);
        assert_invariants(&map);
    }

    #[test]
    fn delete_removes_path_descendants_only() {
        let mut map = MindMap::new("Root", Settings::default());
        let one = map.add_child("1", "one").unwrap();
        let two = map.add_child("1", "two").unwrap();
        map.add_child("1", "three").unwrap();
        map.add_child(&two, "two.one").unwrap();
        map.add_child(&two, "two.two").unwrap();
        map.connect(&one, &id_at(&map, "1.2.2")).unwrap();
        map.delete_node(&one).unwrap();
        assert_eq!(paths(&map), vec!["1", "1.2", "1.2.1", "1.2.2", "1.3"]);

        map.delete_node(&id_at(&map, "1.2")).unwrap();
        assert_eq!(paths(&map), vec!["1", "1.3"]);
        assert!(
            map.edges()
                .iter()
                .all(|e| map.node(&e.source).is_some() && map.node(&e.target).is_some())
        );
    }

    #[test]
    fn child_numbers_are_not_reused_after_delete() {
        let mut map = MindMap::new("Root", Settings::default());
        map.add_child("1", "a").unwrap();
        map.add_child("1", "b").unwrap();
        let c = map.add_child("1", "c").unwrap();
        map.add_child("1", "d").unwrap();
        map.delete_node(&c).unwrap();
        let e = map.add_child("1", "e").unwrap();
        assert_eq!(map.node(&e).unwrap().path.to_string(), "1.5");
    }

    #[test]
    fn root_cannot_be_deleted_or_get_siblings() {
        let mut map = MindMap::new("Root", Settings::default());
        assert_eq!(map.delete_node("1"), None);
        assert_eq!(map.add_sibling("1", "nope"), None);
        assert_eq!(map.add_node(None, "second root", Placement::Child), None);
        assert_eq!(map.nodes().len(), 1);
    }

    #[test]
    fn missing_references_are_noops() {
        let mut map = MindMap::new("Root", Settings::default());
        assert_eq!(map.add_child("404", "x"), None);
        assert_eq!(map.delete_node("404"), None);
        assert_eq!(map.connect("1", "404"), None);
        assert!(!map.rename_node("404", "x"));
        assert!(!map.set_style("404", None));
        assert!(!map.toggle_collapsed("404"));
        assert!(!map.disconnect("m1-404"));
    }

    #[test]
    fn next_free_sibling_avoids_collisions() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        map.add_child("1", "b").unwrap();
        let s = map.add_sibling(&a, "after a").unwrap();
        assert_eq!(map.node(&s).unwrap().path.to_string(), "1.3");
        assert_invariants(&map);
    }

    #[test]
    fn increment_sibling_refuses_taken_slot() {
        let settings = Settings {
            sibling_slot: SiblingSlot::Increment,
            ..Settings::default()
        };
        let mut map = MindMap::new("Root", settings);
        let a = map.add_child("1", "a").unwrap();
        let b = map.add_child("1", "b").unwrap();
        assert_eq!(map.add_sibling(&a, "collides"), None);
        let c = map.add_sibling(&b, "c").unwrap();
        assert_eq!(map.node(&c).unwrap().path.to_string(), "1.3");
        assert_eq!(map.node(&c).unwrap().parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn sibling_shares_parent_and_level() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        let a1 = map.add_child(&a, "a1").unwrap();
        let a2 = map.add_sibling(&a1, "a2").unwrap();
        let node = map.node(&a2).unwrap();
        assert_eq!(node.parent_id.as_deref(), Some(a.as_str()));
        assert_eq!(node.level, 2);
        assert!(
            map.edges()
                .iter()
                .any(|e| e.source == a && e.target == a2 && e.kind == EdgeKind::Tree)
        );
    }

    #[test]
    fn listener_sees_laid_out_state_and_skips_noops() {
        let seen: Rc<RefCell<Vec<MapData>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut map = MindMap::new("Root", Settings::default());
        map.set_listener(move |data| sink.borrow_mut().push(data.clone()));

        let a = map.add_child("1", "a").unwrap();
        map.delete_node("1");
        map.add_child("missing", "x");
        map.rename_node(&a, "renamed");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].nodes.iter().all(|n| n.position.is_some()));
        assert_eq!(seen[0].edges.len(), 1);
        assert_eq!(seen[1].get(&a).unwrap().label, "renamed");
    }

    #[test]
    fn relayout_notifies_without_changing_structure() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut map = MindMap::new("Root", Settings::default());
        map.add_child("1", "a").unwrap();
        let before = map.data().clone();
        map.set_listener(move |_| *sink.borrow_mut() += 1);

        map.relayout();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(map.data(), &before);
    }

    #[test]
    fn connect_and_disconnect_manual_edges() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        let b = map.add_child("1", "b").unwrap();
        let edge = map.connect(&a, &b).unwrap();
        assert_eq!(map.connect(&a, &b), None);
        assert_eq!(map.connect(&a, &a), None);
        assert_eq!(map.connect("1", &a), None, "tree edge already links them");
        assert!(!map.disconnect(&format!("e1-{a}")), "tree edges stay");
        assert!(map.disconnect(&edge));
        assert_eq!(map.edges().len(), 2);
    }

    #[test]
    fn manual_edges_do_not_affect_layout() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        let b = map.add_child("1", "b").unwrap();
        let before = map.nodes().to_vec();
        map.connect(&b, &a).unwrap();
        assert_eq!(map.nodes(), before.as_slice());
    }

    #[test]
    fn style_and_collapse_round_trip() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        let style = NodeStyle {
            border_width: Some(2),
            ..NodeStyle::default()
        };
        assert!(map.set_style(&a, Some(style.clone())));
        assert_eq!(map.node(&a).unwrap().style, Some(style));
        assert!(map.set_style(&a, Some(NodeStyle::default())));
        assert_eq!(map.node(&a).unwrap().style, None);

        assert!(map.toggle_collapsed(&a));
        assert!(map.node(&a).unwrap().collapsed);
    }

    #[test]
    fn outline_rows_respect_collapse() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        map.add_child(&a, "a1").unwrap();
        map.add_child("1", "b").unwrap();
        let labels = |map: &MindMap, collapsed: bool| {
            map.outline_rows(collapsed)
                .into_iter()
                .map(|(n, d)| format!("{d}:{}", n.label))
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(&map, true), vec!["0:Root", "1:a", "2:a1", "1:b"]);
        map.toggle_collapsed(&a);
        assert_eq!(labels(&map, true), vec!["0:Root", "1:a", "1:b"]);
        assert_eq!(labels(&map, false).len(), 4);
    }

    #[test]
    fn find_accepts_id_or_path() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        assert_eq!(map.find(&a).unwrap().label, "a");
        assert_eq!(map.find("1.1").unwrap().id, a);
        assert!(map.find("1.9").is_none());
    }

    #[test]
    fn outline_text_of_session() {
        let mut map = MindMap::new("Main Idea", Settings::default());
        let a = map.add_child("1", "A").unwrap();
        map.add_child(&a, "A1").unwrap();
        map.add_child("1", "B").unwrap();
        assert_eq!(map.outline_text(), "Main Idea\n    A\n        A1\n    B\n");
    }

    #[test]
    fn open_without_root_starts_fresh() {
        let mut stray = Node::new("5", "stray", "1.1".parse().unwrap());
        stray.parent_id = Some("1".into());
        let data = MapData {
            nodes: vec![stray],
            edges: Vec::new(),
        };
        let (map, warnings) = MindMap::open(data, Settings::default());
        assert_eq!(warnings, vec![LoadWarning::MissingRoot]);
        assert_eq!(map.nodes().len(), 1);
        assert_eq!(map.root().unwrap().label, DEFAULT_ROOT_LABEL);
    }

    #[test]
    fn open_accepts_consistent_tree_silently() {
        let mut source = MindMap::new("Root", Settings::default());
        let a = source.add_child("1", "a").unwrap();
        source.add_child(&a, "a1").unwrap();
        let data = source.into_data();

        let (map, warnings) = MindMap::open(data.clone(), Settings::default());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(map.data(), &data);
    }

    #[test]
    fn open_reports_and_repairs_malformed_data() {
        let root = Node::root("1", "Root");
        let mut good = Node::new("2", "good", "1.1".parse().unwrap());
        good.parent_id = Some("1".into());
        good.level = 3;
        let mut orphan = Node::new("3", "orphan", "1.4.1".parse().unwrap());
        orphan.parent_id = Some("99".into());
        let dup = Node::new("2", "dup", "1.7".parse().unwrap());
        let data = MapData {
            nodes: vec![root, good, orphan, dup],
            edges: vec![Edge::tree("1", "404")],
        };

        let (map, warnings) = MindMap::open(data, Settings::default());
        assert!(warnings.contains(&LoadWarning::DuplicateId { id: "2".into() }));
        assert!(warnings.contains(&LoadWarning::LevelMismatch {
            id: "2".into(),
            level: 3,
            path: "1.1".into(),
        }));
        assert!(warnings.contains(&LoadWarning::MissingParent {
            id: "3".into(),
            parent_id: "99".into(),
        }));
        assert!(warnings.contains(&LoadWarning::MissingParentPath {
            id: "3".into(),
            path: "1.4.1".into(),
        }));
        assert!(warnings.contains(&LoadWarning::DanglingEdge {
            id: "e1-404".into()
        }));
        assert!(warnings.contains(&LoadWarning::MissingTreeEdge { id: "2".into() }));

        assert_eq!(map.node("2").unwrap().level, 1);
        assert_eq!(map.node("3").unwrap().position, None);
        assert_eq!(map.layout_report().positioned, 2);
        assert_eq!(map.edges(), &[Edge::tree("1", "2")]);
    }

    #[test]
    fn open_demotes_extra_roots() {
        let data = MapData {
            nodes: vec![Node::root("1", "A"), Node::root("2", "B")],
            edges: Vec::new(),
        };
        let (map, warnings) = MindMap::open(data, Settings::default());
        assert!(warnings.contains(&LoadWarning::ExtraRoot { id: "2".into() }));
        assert!(!map.node("2").unwrap().is_root);
        assert_eq!(map.root().unwrap().id, "1");
    }

    #[test]
    fn new_ids_skip_past_existing_numeric_ids() {
        let mut root = Node::root("41", "Root");
        root.position = None;
        let data = MapData {
            nodes: vec![root],
            edges: Vec::new(),
        };
        let (mut map, _) = MindMap::open(data, Settings::default());
        assert_eq!(map.add_child("41", "x").as_deref(), Some("42"));
    }

    #[test]
    fn new_ids_fall_back_to_lowest_free_number_at_u64_max() {
        let data = MapData {
            nodes: vec![Node::root("18446744073709551615", "Root")],
            edges: Vec::new(),
        };
        let (mut map, warnings) = MindMap::open(data, Settings::default());
        assert!(warnings.is_empty());
        let a = map.add_child("18446744073709551615", "a");
        assert_eq!(a.as_deref(), Some("1"));
        let b = map.add_child("18446744073709551615", "b");
        assert_eq!(b.as_deref(), Some("2"));
        assert_invariants(&map);
    }

    #[test]
    fn add_is_refused_once_child_numbers_run_out() {
        let mut last = Node::new("2", "last", "1.4294967295".parse().unwrap());
        last.parent_id = Some("1".into());
        let data = MapData {
            nodes: vec![Node::root("1", "Root"), last],
            edges: vec![Edge::tree("1", "2")],
        };
        let (mut map, warnings) = MindMap::open(data, Settings::default());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

        assert_eq!(map.add_child("1", "x"), None);
        assert_eq!(map.add_sibling("2", "y"), None);
        assert_eq!(map.nodes().len(), 2);

        let deeper = map.add_child("2", "z").unwrap();
        assert_eq!(map.node(&deeper).unwrap().path.to_string(), "1.4294967295.1");
        assert_invariants(&map);
    }

    #[test]
    fn increment_slot_is_refused_at_max_segment() {
        let settings = Settings {
            sibling_slot: SiblingSlot::Increment,
            ..Settings::default()
        };
        let mut last = Node::new("2", "last", "1.4294967295".parse().unwrap());
        last.parent_id = Some("1".into());
        let data = MapData {
            nodes: vec![Node::root("1", "Root"), last],
            edges: vec![Edge::tree("1", "2")],
        };
        let (mut map, _) = MindMap::open(data, settings);
        assert_eq!(map.add_sibling("2", "y"), None);
    }

    #[test]
    fn labels_are_stored_on_one_line() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "A\n    B").unwrap();
        assert_eq!(map.node(&a).unwrap().label, "A     B");
        map.add_child(&a, "child").unwrap();

        assert!(map.rename_node(&a, "\tRenamed\r\n"));
        assert_eq!(map.node(&a).unwrap().label, "Renamed");
        assert!(!map.rename_node(&a, "Renamed\n"), "same label once cleaned");

        let entries = crate::parser::outline::parse(&map.outline_text()).unwrap();
        assert_eq!(entries.len(), map.nodes().len());
        assert_eq!(entries[1].label, "Renamed");
    }

    #[test]
    fn open_cleans_control_characters_in_labels() {
        let mut child = Node::new("2", "two\nlines", "1.1".parse().unwrap());
        child.parent_id = Some("1".into());
        let data = MapData {
            nodes: vec![Node::root("1", "Root"), child],
            edges: vec![Edge::tree("1", "2")],
        };
        let (map, warnings) = MindMap::open(data, Settings::default());
        assert_eq!(warnings, vec![LoadWarning::LabelCleaned { id: "2".into() }]);
        assert_eq!(map.node("2").unwrap().label, "two lines");
    }

    #[test]
    fn settings_change_relays_out() {
        let mut map = MindMap::new("Root", Settings::default());
        let a = map.add_child("1", "a").unwrap();
        let mut settings = map.settings().clone();
        settings.layout.horizontal_spacing = 40.0;
        map.set_settings(settings);
        assert_eq!(map.node(&a).unwrap().position, Some(Position::new(40.0, 0.0)));
    }
}
