//! [`PanelsManager`]: owns the dock tree and drives docking interactions frame by frame.

mod interaction;
mod render;


use egui::Rect;

use crate::dock::{
    Clean, DockContext, DockNode, DockPosition, DockTree, NodeId, tree_integrity_issues,
};
use crate::draw::TextMeasure;
use crate::panel::{PanelId, Panels};
use crate::style::DockStyle;

use interaction::Interaction;

pub use render::FrameOutput;

/// Placeholder shown by the documents zone when no document is open.
pub const DOCUMENTS_PLACEHOLDER: &str = "Documents View";

/// Owns the dock layout tree of one window.
///
/// The tree only stores [`PanelId`]s; the panels themselves live in a [`Panels`] registry the
/// caller passes in where titles or layout sinks are needed.
#[derive(Debug)]
pub struct PanelsManager {
    pub style: DockStyle,

    tree: DockTree,
    root: NodeId,

    /// The keep-around zone receiving panels added without a dock parent.
    document_zone: NodeId,

    /// Rect passed to the last [`Self::update_layout`], reused to relayout after a drop.
    viewport: Rect,

    interaction: Interaction,

    // Set during the frame the corresponding action is committed.
    dropped_panel: bool,
    dropped_split: bool,
    closed_panel: bool,
}

impl Default for PanelsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelsManager {
    /// A manager whose whole layout is an empty documents zone.
    pub fn new() -> Self {
        Self::with_style(DockStyle::default())
    }

    pub fn with_style(style: DockStyle) -> Self {
        let mut tree = DockTree::new();
        let documents = tree.insert(DockNode::keep_around(DOCUMENTS_PLACEHOLDER));
        Self::from_parts(style, tree, documents, documents)
    }

    pub(crate) fn from_parts(
        style: DockStyle,
        tree: DockTree,
        root: NodeId,
        document_zone: NodeId,
    ) -> Self {
        Self {
            style,
            tree,
            root,
            document_zone,
            viewport: Rect::ZERO,
            interaction: Interaction::Idle,
            dropped_panel: false,
            dropped_split: false,
            closed_panel: false,
        }
    }

    pub fn tree(&self) -> &DockTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn document_zone(&self) -> NodeId {
        self.document_zone
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Compact textual form of the layout, e.g. `H(Docs[1] | Zone[2])`.
    pub fn describe(&self) -> String {
        self.tree.describe(self.root)
    }

    /// Dock `panel` as described by `ctx`. A panel that is already docked is left where it is.
    pub fn dock_panel(&mut self, panel: PanelId, ctx: &DockContext) {
        if self.find(panel).is_some() {
            log::debug!("{panel:?} is already docked");
            return;
        }
        let root = self.tree.dock_panel(self.root, panel, ctx);
        if root != self.root {
            log::debug!("root {:?} wrapped by {root:?}", self.root);
            self.root = root;
        }
        log::debug!("docked {panel:?} at {:?} of {:?}", ctx.position, ctx.target);
    }

    /// Tombstone `panel`. Call [`Self::clean_dock`] afterwards to simplify the tree.
    pub fn undock_panel(&mut self, panel: PanelId) -> bool {
        let undocked = self.tree.undock_panel(self.root, panel);
        if undocked {
            log::debug!("undocked {panel:?}");
        }
        undocked
    }

    /// Compact zones and prune empty branches.
    ///
    /// Should the whole tree vanish, an empty documents zone becomes the new root.
    pub fn clean_dock(&mut self) {
        match self.tree.clean(self.root) {
            Clean::Keep => {}
            Clean::Replace(root) => {
                log::debug!("root {:?} collapsed into {root:?}", self.root);
                self.root = root;
            }
            Clean::Null => {
                log::warn!("dock tree collapsed; reinstating an empty documents zone");
                let documents = self
                    .tree
                    .insert(DockNode::keep_around(DOCUMENTS_PLACEHOLDER));
                self.root = documents;
                self.document_zone = documents;
            }
        }

        if cfg!(debug_assertions) {
            for issue in tree_integrity_issues(&self.tree, self.root) {
                log::warn!("{issue}");
            }
        }
    }

    /// The zone holding `panel` and its tab index.
    pub fn find(&self, panel: PanelId) -> Option<(NodeId, usize)> {
        self.tree.find(self.root, panel)
    }

    /// Programmatic docking.
    ///
    /// Without `parent` the panel becomes the active tab of the documents zone. Otherwise it
    /// is placed relative to the zone holding `parent`: as a new tab for [`DockPosition::Center`],
    /// right after the parent's tab for [`DockPosition::Tab`], or in a new split for the edge
    /// positions. A parent that is not docked falls back to the documents zone.
    pub fn add_panel(&mut self, panel: PanelId, parent: Option<PanelId>, position: DockPosition) {
        // Without a docked parent the panel always joins the documents zone as a tab.
        let (zone, parent_index, position) = match parent.map(|parent| (parent, self.find(parent))) {
            None => (self.document_zone, None, DockPosition::Center),
            Some((_, Some((zone, index)))) => (zone, Some(index), position),
            Some((parent, None)) => {
                log::debug!("dock parent {parent:?} is not docked; using the documents zone");
                (self.document_zone, None, DockPosition::Center)
            }
        };

        let mut ctx = DockContext::targeting(zone, position);
        match position {
            DockPosition::Center => {}
            DockPosition::Tab => {
                ctx.tab_index = parent_index.map_or(usize::MAX, |index| index + 1);
            }
            DockPosition::Left | DockPosition::Right | DockPosition::Top | DockPosition::Bottom => {
                if self.tree.boundary_of(self.root, zone, &mut ctx) {
                    if let Some(rect) = self.tree.zone(zone).map(|z| z.rect()) {
                        ctx.apply_edge_defaults(rect, &self.style);
                    }
                }
            }
        }

        self.dock_panel(panel, &ctx);
    }

    /// Take `panel` out of the layout and simplify the tree.
    pub fn remove_panel(&mut self, panel: PanelId) -> bool {
        if self.interaction.involves(panel) {
            log::trace!("dropping the interaction on removed {panel:?}");
            self.interaction = Interaction::Idle;
        }
        let removed = self.undock_panel(panel);
        if removed {
            self.clean_dock();
        }
        removed
    }

    /// Assign `viewport` to the root and lay out the whole tree.
    pub fn update_layout(&mut self, viewport: Rect, panels: &mut Panels, measure: &dyn TextMeasure) {
        self.viewport = viewport;
        self.tree
            .update_layout(self.root, viewport, panels, &self.style, measure);
    }

    fn relayout(&mut self, panels: &mut Panels, measure: &dyn TextMeasure) {
        self.update_layout(self.viewport, panels, measure);
    }

    /// The panel being dragged, once the drag threshold has been passed.
    pub fn dragging_panel(&self) -> Option<PanelId> {
        self.interaction.dragging_panel()
    }

    pub fn dragging_split(&self) -> Option<NodeId> {
        self.interaction.dragging_split()
    }

    /// True while a tab press or drag is in progress.
    pub fn is_interacting(&self) -> bool {
        !self.interaction.is_idle()
    }

    /// A panel drop was committed during the last frame.
    pub fn dropped_panel(&self) -> bool {
        self.dropped_panel
    }

    /// A split resize was committed during the last frame.
    pub fn dropped_split(&self) -> bool {
        self.dropped_split
    }

    /// At least one tab was closed during the last frame.
    pub fn closed_panel(&self) -> bool {
        self.closed_panel
    }

    /// Capture the current layout.
    #[cfg(feature = "serde")]
    pub fn snapshot(&self) -> crate::dock::LayoutSnapshot {
        crate::dock::LayoutSnapshot::capture(&self.tree, self.root)
    }

    /// Replace the layout with `snapshot`, keeping only panels present in `panels`.
    ///
    /// The new tree is not laid out yet; call [`Self::update_layout`] next.
    ///
    /// # Errors
    /// Fails if the snapshot has an unsupported version, broken node references, or not
    /// exactly one documents zone. The current layout is kept in that case.
    #[cfg(feature = "serde")]
    pub fn restore(
        &mut self,
        snapshot: &crate::dock::LayoutSnapshot,
        panels: &Panels,
    ) -> Result<(), crate::dock::LayoutSnapshotError> {
        let crate::dock::RestoredLayout {
            tree,
            root,
            documents,
        } = snapshot.build(|panel| panels.contains(panel))?;
        log::debug!("restored layout {}", tree.describe(root));
        self.tree = tree;
        self.root = root;
        self.document_zone = documents;
        self.interaction = Interaction::Idle;
        Ok(())
    }
}
