use std::collections::BTreeMap;

use crate::dock::{Clean, DockNode, DockTree, Magnet, NodeId, Split, SplitAxis, Zone};
use crate::manager::{DOCUMENTS_PLACEHOLDER, PanelsManager};
use crate::panel::PanelId;
use crate::style::DockStyle;

/// Split direction with Dear ImGui `DockBuilder::SplitNode`-like semantics.
///
/// The direction indicates where the *side* node is placed relative to the *main* node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A logical node id used by [`DockBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum SideSize {
    /// Share of the parent span, `0.0..=1.0`.
    Fraction(f32),

    /// Fixed size in points, kept when the parent is resized.
    Points(f32),
}

#[derive(Clone, Debug)]
enum Node {
    Tabs {
        panels: Vec<PanelId>,
        documents: bool,
    },
    Split {
        dir: SplitDirection,
        size: SideSize,
        main: DockNodeId,
        side: DockNodeId,
    },
}

/// Scripted layouts that feel close to Dear ImGui's `DockBuilder`:
/// split nodes, dock panels into leaf nodes, then [`Self::finish`] into a [`PanelsManager`].
///
/// The builder starts with a single leaf, [`Self::root`], which is the documents zone. Splitting
/// a node moves its content (documents marker included) into the returned `main` node.
/// Leaves left without panels are dropped when finishing, except for the documents zone.
pub struct DockBuilder {
    next_node_id: u64,
    root: DockNodeId,
    nodes: BTreeMap<DockNodeId, Node>,
}

impl Default for DockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DockBuilder {
    pub fn new() -> Self {
        let root = DockNodeId(1);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root,
            Node::Tabs {
                panels: Vec::new(),
                documents: true,
            },
        );
        Self {
            next_node_id: 2,
            root,
            nodes,
        }
    }

    /// The node covering the whole dock.
    pub fn root(&self) -> DockNodeId {
        self.root
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    fn split(&mut self, node: DockNodeId, dir: SplitDirection, size: SideSize) -> (DockNodeId, DockNodeId) {
        let old = self.nodes.remove(&node).unwrap_or(Node::Tabs {
            panels: Vec::new(),
            documents: false,
        });
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side = self.alloc_node_id();
        self.nodes.insert(
            side,
            Node::Tabs {
                panels: Vec::new(),
                documents: false,
            },
        );

        self.nodes.insert(
            node,
            Node::Split {
                dir,
                size,
                main,
                side,
            },
        );

        (side, main)
    }

    /// Split an existing node and return `(side, main)` (Dear ImGui semantics).
    ///
    /// `side_fraction` is the share of `node` given to the side (`0.0..=1.0`). The `node` itself
    /// becomes the split, and its original content moves into the returned `main` node.
    #[must_use]
    pub fn split_node(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_fraction: f32,
    ) -> (DockNodeId, DockNodeId) {
        debug_assert!(
            (0.0..=1.0).contains(&side_fraction),
            "side_fraction must be in 0.0..=1.0"
        );
        self.split(node, dir, SideSize::Fraction(side_fraction))
    }

    /// Like [`Self::split_node`], but the side keeps a fixed size of `side_points` when the dock
    /// is resized.
    #[must_use]
    pub fn split_node_fixed(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_points: f32,
    ) -> (DockNodeId, DockNodeId) {
        debug_assert!(side_points >= 0.0, "side_points must not be negative");
        self.split(node, dir, SideSize::Points(side_points))
    }

    /// Dock a panel into a leaf node, as its last tab.
    ///
    /// # Panics
    /// If `node` has been split or does not exist.
    pub fn dock_panel(&mut self, panel: PanelId, node: DockNodeId) {
        match self.nodes.get_mut(&node) {
            Some(Node::Tabs { panels, .. }) => panels.push(panel),
            Some(Node::Split { .. }) => {
                panic!("dock_panel: node {node:?} is not a leaf node");
            }
            None => {
                panic!("dock_panel: node {node:?} does not exist");
            }
        }
    }

    /// Dock multiple panels into a leaf node (tabbed together).
    ///
    /// # Panics
    /// If `node` has been split or does not exist.
    pub fn dock_panels(&mut self, panels: impl IntoIterator<Item = PanelId>, node: DockNodeId) {
        for panel in panels {
            self.dock_panel(panel, node);
        }
    }

    /// Alias for [`Self::dock_panel`], named after Dear ImGui's `DockBuilder::DockWindow`.
    ///
    /// # Panics
    /// If `node` has been split or does not exist.
    pub fn dock_window(&mut self, panel: PanelId, node: DockNodeId) {
        self.dock_panel(panel, node);
    }

    /// Finish building with the default style.
    pub fn finish(self) -> PanelsManager {
        self.finish_with_style(DockStyle::default())
    }

    pub fn finish_with_style(self, style: DockStyle) -> PanelsManager {
        fn build_node(
            node_id: DockNodeId,
            nodes: &mut BTreeMap<DockNodeId, Node>,
            tree: &mut DockTree,
            documents: &mut Option<NodeId>,
        ) -> NodeId {
            match nodes.remove(&node_id) {
                Some(Node::Tabs {
                    panels,
                    documents: true,
                }) => {
                    let active = panels.len().saturating_sub(1);
                    let id = tree.insert(DockNode::KeepAround {
                        zone: Zone::new(panels, active),
                        placeholder: DOCUMENTS_PLACEHOLDER.to_owned(),
                    });
                    *documents = Some(id);
                    id
                }
                Some(Node::Tabs { panels, .. }) => {
                    let active = panels.len().saturating_sub(1);
                    tree.insert(DockNode::Zone(Zone::new(panels, active)))
                }
                Some(Node::Split {
                    dir,
                    size,
                    main,
                    side,
                }) => {
                    let main = build_node(main, nodes, tree, documents);
                    let side = build_node(side, nodes, tree, documents);

                    let (axis, side_first) = match dir {
                        SplitDirection::Left => (SplitAxis::Horizontal, true),
                        SplitDirection::Right => (SplitAxis::Horizontal, false),
                        SplitDirection::Up => (SplitAxis::Vertical, true),
                        SplitDirection::Down => (SplitAxis::Vertical, false),
                    };
                    let (first, second) = if side_first { (side, main) } else { (main, side) };
                    let (amount, magnet) = match (size, side_first) {
                        (SideSize::Fraction(f), true) => (f, Magnet::Middle),
                        (SideSize::Fraction(f), false) => (1.0 - f, Magnet::Middle),
                        (SideSize::Points(points), true) => (points, Magnet::Start),
                        (SideSize::Points(points), false) => (points, Magnet::End),
                    };
                    tree.insert(DockNode::split(axis, Split::new(first, second, amount, magnet)))
                }
                None => tree.insert(DockNode::Zone(Zone::default())),
            }
        }

        let mut nodes = self.nodes;
        let mut tree = DockTree::new();
        let mut documents = None;
        let root = build_node(self.root, &mut nodes, &mut tree, &mut documents);

        // The root always holds the documents marker: splitting only ever moves it to `main`.
        let documents = documents.unwrap_or(root);
        let root = match tree.clean(root) {
            Clean::Keep => root,
            Clean::Replace(replacement) => replacement,
            Clean::Null => tree.insert(DockNode::keep_around(DOCUMENTS_PLACEHOLDER)),
        };
        let documents = if tree.get(documents).is_some() {
            documents
        } else {
            root
        };
        PanelsManager::from_parts(style, tree, root, documents)
    }
}
