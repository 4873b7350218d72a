//! The node arena and the recursive layout, hit-test, dock and clean passes.

use std::collections::BTreeMap;

use egui::{Pos2, Rect, pos2, vec2};
use itertools::Itertools as _;

use super::context::{DockContext, DockPosition};
use super::geometry::{self, Magnet, SplitAxis};
use super::zone::Zone;
use crate::draw::TextMeasure;
use crate::panel::{Panel, PanelId, Panels};
use crate::style::DockStyle;

/// Width of the insertion marker shown when previewing a tab drop.
const TAB_MARKER_WIDTH: f32 = 4.0;

/// Stable address of a node in a [`DockTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Internal node: two children and the position of the line between them.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    /// Left (`HSplit`) or top (`VSplit`) child.
    pub first: NodeId,

    /// Right (`HSplit`) or bottom (`VSplit`) child.
    pub second: NodeId,

    pub amount: f32,
    pub magnet: Magnet,

    rect: Rect,
}

impl Split {
    pub fn new(first: NodeId, second: NodeId, amount: f32, magnet: Magnet) -> Self {
        Self {
            first,
            second,
            amount,
            magnet,
            rect: Rect::ZERO,
        }
    }

    /// Rect assigned by the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Offset of the split line from the start of this split's rect.
    pub fn split_pos(&self, axis: SplitAxis) -> f32 {
        geometry::split_pos(self.amount, self.magnet, axis.span(self.rect))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DockNode {
    /// Tabbed stack of panels, removed by the clean pass once empty.
    Zone(Zone),

    /// A zone that survives being emptied and shows `placeholder` instead.
    KeepAround { zone: Zone, placeholder: String },

    /// Children side by side.
    HSplit(Split),

    /// Children stacked.
    VSplit(Split),
}

impl DockNode {
    pub fn keep_around(placeholder: impl Into<String>) -> Self {
        Self::KeepAround {
            zone: Zone::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn split(axis: SplitAxis, split: Split) -> Self {
        match axis {
            SplitAxis::Horizontal => Self::HSplit(split),
            SplitAxis::Vertical => Self::VSplit(split),
        }
    }

    pub fn as_zone(&self) -> Option<&Zone> {
        match self {
            Self::Zone(zone) | Self::KeepAround { zone, .. } => Some(zone),
            Self::HSplit(_) | Self::VSplit(_) => None,
        }
    }

    pub fn as_zone_mut(&mut self) -> Option<&mut Zone> {
        match self {
            Self::Zone(zone) | Self::KeepAround { zone, .. } => Some(zone),
            Self::HSplit(_) | Self::VSplit(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<(SplitAxis, &Split)> {
        match self {
            Self::HSplit(split) => Some((SplitAxis::Horizontal, split)),
            Self::VSplit(split) => Some((SplitAxis::Vertical, split)),
            Self::Zone(_) | Self::KeepAround { .. } => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<(SplitAxis, &mut Split)> {
        match self {
            Self::HSplit(split) => Some((SplitAxis::Horizontal, split)),
            Self::VSplit(split) => Some((SplitAxis::Vertical, split)),
            Self::Zone(_) | Self::KeepAround { .. } => None,
        }
    }

    pub fn is_keep_around(&self) -> bool {
        matches!(self, Self::KeepAround { .. })
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        self.as_split().map(|(_, split)| [split.first, split.second])
    }

    pub fn rect(&self) -> Rect {
        match self {
            Self::Zone(zone) | Self::KeepAround { zone, .. } => zone.rect(),
            Self::HSplit(split) | Self::VSplit(split) => split.rect,
        }
    }
}

/// Outcome of cleaning one node.
///
/// A node answering `Replace` or `Null` has already been removed from the arena; the caller
/// must update the slot that referenced it.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clean {
    /// Keep referencing the same node.
    Keep,

    /// The node collapsed into this one.
    Replace(NodeId),

    /// The subtree is empty and must be dropped by the parent.
    Null,
}

/// Arena holding every node of a dock layout.
///
/// The tree operations are addressed by node id and recurse through children. Which node is
/// the root is decided by the owner ([`crate::PanelsManager`]).
#[derive(Clone, Debug, Default)]
pub struct DockTree {
    nodes: BTreeMap<NodeId, DockNode>,
    next_id: u64,
}

impl DockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: DockNode) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DockNode> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<DockNode> {
        self.nodes.remove(&id)
    }

    pub fn zone(&self, id: NodeId) -> Option<&Zone> {
        self.get(id).and_then(DockNode::as_zone)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(DockNode::rect)
    }

    /// Assign `rect` to `id` and lay out its subtree.
    pub fn update_layout(
        &mut self,
        id: NodeId,
        rect: Rect,
        panels: &mut Panels,
        style: &DockStyle,
        measure: &dyn TextMeasure,
    ) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };

        if let Some(zone) = node.as_zone_mut() {
            zone.set_rect(rect);
            layout_zone(zone, panels, style, measure);
            return;
        }

        let Some((axis, split)) = node.as_split_mut() else {
            return;
        };
        split.rect = rect;
        let pos = split.split_pos(axis);
        let (first, second) = (split.first, split.second);
        let (first_rect, second_rect) = geometry::split_rects(rect, axis, pos, style.panel_margin);
        self.update_layout(first, first_rect, panels, style, measure);
        self.update_layout(second, second_rect, panels, style, measure);
    }

    /// Hit-test `pointer` and describe the drop it would perform into `ctx`.
    ///
    /// Splits forward to the child containing the pointer and clear the boundary flag on the
    /// side facing the sibling. `ctx.target` stays `None` if no zone is hit.
    pub fn dock(
        &self,
        id: NodeId,
        pointer: Pos2,
        ctx: &mut DockContext,
        panels: &Panels,
        style: &DockStyle,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };

        match node {
            DockNode::Zone(zone) | DockNode::KeepAround { zone, .. } => {
                dock_zone(id, zone, pointer, ctx, panels, style);
            }
            DockNode::HSplit(split) => {
                if self.rect_of(split.first).is_some_and(|r| r.contains(pointer)) {
                    ctx.right_most = false;
                    self.dock(split.first, pointer, ctx, panels, style);
                } else if self.rect_of(split.second).is_some_and(|r| r.contains(pointer)) {
                    ctx.left_most = false;
                    self.dock(split.second, pointer, ctx, panels, style);
                }
            }
            DockNode::VSplit(split) => {
                if self.rect_of(split.first).is_some_and(|r| r.contains(pointer)) {
                    ctx.bottom_most = false;
                    self.dock(split.first, pointer, ctx, panels, style);
                } else if self.rect_of(split.second).is_some_and(|r| r.contains(pointer)) {
                    ctx.top_most = false;
                    self.dock(split.second, pointer, ctx, panels, style);
                }
            }
        }
    }

    /// Tombstone `panel` wherever it is docked below `id`. Both sides of every split are visited.
    pub fn undock_panel(&mut self, id: NodeId, panel: PanelId) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };

        if let Some(zone) = node.as_zone_mut() {
            return zone.tombstone(panel);
        }

        let Some([first, second]) = node.children() else {
            return false;
        };
        let in_first = self.undock_panel(first, panel);
        let in_second = self.undock_panel(second, panel);
        in_first || in_second
    }

    /// Bottom-up simplification: compact zones, drop empty ones, unwrap one-sided splits.
    pub fn clean(&mut self, id: NodeId) -> Clean {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::warn!("clean reached missing node {id:?}");
            return Clean::Null;
        };

        match node {
            DockNode::KeepAround { zone, .. } => {
                zone.compact();
                Clean::Keep
            }
            DockNode::Zone(zone) => {
                zone.compact();
                if zone.is_empty() {
                    self.nodes.remove(&id);
                    Clean::Null
                } else {
                    Clean::Keep
                }
            }
            DockNode::HSplit(split) | DockNode::VSplit(split) => {
                let (first, second) = (split.first, split.second);
                let first = self.clean_child(first);
                let second = self.clean_child(second);
                match (first, second) {
                    (None, None) => {
                        self.nodes.remove(&id);
                        Clean::Null
                    }
                    (Some(survivor), None) | (None, Some(survivor)) => {
                        self.nodes.remove(&id);
                        Clean::Replace(survivor)
                    }
                    (Some(first), Some(second)) => {
                        if let Some((_, split)) = self.get_mut(id).and_then(DockNode::as_split_mut) {
                            split.first = first;
                            split.second = second;
                        }
                        Clean::Keep
                    }
                }
            }
        }
    }

    fn clean_child(&mut self, id: NodeId) -> Option<NodeId> {
        match self.clean(id) {
            Clean::Keep => Some(id),
            Clean::Replace(replacement) => Some(replacement),
            Clean::Null => None,
        }
    }

    /// Dock `panel` as described by `ctx`. Only the zone named by `ctx.target` acts.
    ///
    /// Returns the id that should now occupy the slot of `id`: `id` itself, or a new split
    /// when an edge drop turned a zone into a split.
    pub fn dock_panel(&mut self, id: NodeId, panel: PanelId, ctx: &DockContext) -> NodeId {
        let Some(node) = self.nodes.get_mut(&id) else {
            return id;
        };

        if let Some(zone) = node.as_zone_mut() {
            if ctx.target != Some(id) {
                return id;
            }

            let (axis, new_first) = match ctx.position {
                DockPosition::Center => {
                    zone.push(panel);
                    return id;
                }
                DockPosition::Tab => {
                    zone.insert(ctx.tab_index, panel);
                    return id;
                }
                DockPosition::Left => (SplitAxis::Horizontal, true),
                DockPosition::Right => (SplitAxis::Horizontal, false),
                DockPosition::Top => (SplitAxis::Vertical, true),
                DockPosition::Bottom => (SplitAxis::Vertical, false),
            };

            let rect = zone.rect();
            let leaf = self.insert(DockNode::Zone(Zone::with_panel(panel)));
            let (first, second) = if new_first { (leaf, id) } else { (id, leaf) };
            let mut split = Split::new(first, second, ctx.amount, ctx.magnet);
            split.rect = rect;
            return self.insert(DockNode::split(axis, split));
        }

        let Some([first, second]) = node.children() else {
            return id;
        };
        let new_first = self.dock_panel(first, panel, ctx);
        let new_second = self.dock_panel(second, panel, ctx);
        if let Some((_, split)) = self.get_mut(id).and_then(DockNode::as_split_mut) {
            split.first = new_first;
            split.second = new_second;
        }
        id
    }

    /// The zone holding `panel` below `id`, and the panel's slot index in it.
    pub fn find(&self, id: NodeId, panel: PanelId) -> Option<(NodeId, usize)> {
        match self.get(id)? {
            DockNode::Zone(zone) | DockNode::KeepAround { zone, .. } => {
                zone.position(panel).map(|index| (id, index))
            }
            DockNode::HSplit(split) | DockNode::VSplit(split) => self
                .find(split.first, panel)
                .or_else(|| self.find(split.second, panel)),
        }
    }

    /// Set the boundary flags of `ctx` as seen by `target` when reached from `from`.
    ///
    /// Returns false (leaving `ctx` untouched) if `target` is not below `from`.
    pub fn boundary_of(&self, from: NodeId, target: NodeId, ctx: &mut DockContext) -> bool {
        if from == target {
            return self.get(target).is_some();
        }
        let Some((axis, split)) = self.get(from).and_then(DockNode::as_split) else {
            return false;
        };

        let mut inner = *ctx;
        match axis {
            SplitAxis::Horizontal => inner.right_most = false,
            SplitAxis::Vertical => inner.bottom_most = false,
        }
        if self.boundary_of(split.first, target, &mut inner) {
            *ctx = inner;
            return true;
        }

        let mut inner = *ctx;
        match axis {
            SplitAxis::Horizontal => inner.left_most = false,
            SplitAxis::Vertical => inner.top_most = false,
        }
        if self.boundary_of(split.second, target, &mut inner) {
            *ctx = inner;
            return true;
        }
        false
    }

    /// The first keep-around zone below `id`, depth first.
    pub fn find_keep_around(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.is_keep_around() {
            return Some(id);
        }
        let [first, second] = node.children()?;
        self.find_keep_around(first)
            .or_else(|| self.find_keep_around(second))
    }

    /// One-line summary of the subtree, e.g. `H(Docs[1] | Zone[2,3]*1)`.
    ///
    /// Zones list panel ids (`_` for tombstones) followed by `*active` when more than one
    /// panel is docked.
    pub fn describe(&self, id: NodeId) -> String {
        fn slots(zone: &Zone) -> String {
            let list = zone
                .slots()
                .iter()
                .map(|slot| slot.map_or_else(|| "_".to_owned(), |p| p.raw().to_string()))
                .join(",");
            if zone.slots().len() > 1 {
                format!("[{list}]*{}", zone.active_index())
            } else {
                format!("[{list}]")
            }
        }

        match self.get(id) {
            None => format!("?{}", id.0),
            Some(DockNode::Zone(zone)) => format!("Zone{}", slots(zone)),
            Some(DockNode::KeepAround { zone, .. }) => format!("Docs{}", slots(zone)),
            Some(DockNode::HSplit(split)) => format!(
                "H({} | {})",
                self.describe(split.first),
                self.describe(split.second)
            ),
            Some(DockNode::VSplit(split)) => format!(
                "V({} / {})",
                self.describe(split.first),
                self.describe(split.second)
            ),
        }
    }
}

fn layout_zone(zone: &Zone, panels: &mut Panels, style: &DockStyle, measure: &dyn TextMeasure) {
    let (strip, content) = geometry::tab_strip_and_content(zone.rect(), style.control_height);
    let widths = zone
        .panels()
        .map(|p| style.tab_width(measure.text_width(panels.title(p)), panels.is_closable(p)))
        .collect_vec();
    let tabs = geometry::layout_tabs(strip, widths, style.tab_spacing);

    for (id, tab) in zone.panels().zip(tabs) {
        if let Some(panel) = panels.get_mut(id) {
            panel.update_layout(content);
            panel.set_tab_rect(tab.unwrap_or(Rect::ZERO));
        }
    }
}

fn dock_zone(
    id: NodeId,
    zone: &Zone,
    pointer: Pos2,
    ctx: &mut DockContext,
    panels: &Panels,
    style: &DockStyle,
) {
    let rect = zone.rect();
    let content_height = rect.height() - style.control_height;
    let x = (pointer.x - rect.min.x) / rect.width();
    let y = (pointer.y - rect.min.y - style.control_height) / content_height;

    ctx.target = Some(id);
    ctx.position = DockPosition::Center;

    if y < 0.0 || content_height <= 0.0 {
        ctx.position = DockPosition::Tab;
        ctx.tab_index = tab_insert_index(zone, pointer.x, panels);
    } else if rect.height() > rect.width() {
        if y < 0.25 {
            ctx.position = DockPosition::Top;
        } else if y > 0.75 {
            ctx.position = DockPosition::Bottom;
        } else if x < 0.25 {
            ctx.position = DockPosition::Left;
        } else if x > 0.75 {
            ctx.position = DockPosition::Right;
        }
    } else if x < 0.25 {
        ctx.position = DockPosition::Left;
    } else if x > 0.75 {
        ctx.position = DockPosition::Right;
    } else if y < 0.25 {
        ctx.position = DockPosition::Top;
    } else if y > 0.75 {
        ctx.position = DockPosition::Bottom;
    }

    ctx.apply_edge_defaults(rect, style);
    ctx.preview = preview_rect(zone, ctx, panels, style);
}

/// Slot index a tab dropped at `x` is inserted at: the first laid-out tab reaching `x`, or
/// just after the last laid-out tab.
fn tab_insert_index(zone: &Zone, x: f32, panels: &Panels) -> usize {
    let mut index = 0;
    for (slot, panel) in zone.slots().iter().enumerate() {
        let Some(panel) = panel else {
            continue;
        };
        let tab = panels.get(*panel).map_or(Rect::ZERO, Panel::tab_rect);
        if tab.width() <= 0.0 {
            break;
        }
        if x <= tab.max.x {
            return slot;
        }
        index = slot + 1;
    }
    index
}

fn preview_rect(zone: &Zone, ctx: &DockContext, panels: &Panels, style: &DockStyle) -> Rect {
    let rect = zone.rect();
    let half = vec2(rect.width() * 0.5, rect.height() * 0.5);
    match ctx.position {
        DockPosition::Center => rect,
        DockPosition::Left => Rect::from_min_size(rect.min, vec2(half.x, rect.height())),
        DockPosition::Right => Rect::from_min_max(pos2(rect.min.x + half.x, rect.min.y), rect.max),
        DockPosition::Top => Rect::from_min_size(rect.min, vec2(rect.width(), half.y)),
        DockPosition::Bottom => Rect::from_min_max(pos2(rect.min.x, rect.min.y + half.y), rect.max),
        DockPosition::Tab => {
            let tab_of = |slot: Option<PanelId>| {
                slot.and_then(|p| panels.get(p))
                    .map(Panel::tab_rect)
                    .filter(|tab| tab.width() > 0.0)
            };
            let x = zone
                .slots()
                .get(ctx.tab_index)
                .and_then(|slot| tab_of(*slot))
                .map(|tab| tab.min.x)
                .or_else(|| {
                    zone.slots()
                        .iter()
                        .filter_map(|slot| tab_of(*slot))
                        .last()
                        .map(|tab| tab.max.x + style.tab_spacing)
                })
                .unwrap_or(rect.min.x);
            Rect::from_min_size(
                pos2((x - TAB_MARKER_WIDTH).max(rect.min.x), rect.min.y),
                vec2(TAB_MARKER_WIDTH, style.control_height.min(rect.height())),
            )
        }
    }
}
