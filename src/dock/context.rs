//! Drop targets: where a dragged panel would land and how large the new split is.

use egui::Rect;

use super::geometry::Magnet;
use super::tree::NodeId;
use crate::style::DockStyle;

/// Where a panel lands relative to its target zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockPosition {
    /// Append as the last tab.
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,

    /// Insert at [`DockContext::tab_index`].
    Tab,
}

impl DockPosition {
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Top | Self::Bottom)
    }
}

/// A requested or previewed docking action.
///
/// Produced by [`super::DockTree::dock`] while a panel is dragged (or built by hand for
/// programmatic docking) and consumed by [`super::DockTree::dock_panel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockContext {
    /// The zone that receives the panel. `None` means "nowhere".
    pub target: Option<NodeId>,
    pub position: DockPosition,
    pub tab_index: usize,

    /// Split amount for edge positions, interpreted through `magnet`.
    pub amount: f32,
    pub magnet: Magnet,

    /// Whether the node being visited touches the outer edge of the dock on each side.
    pub left_most: bool,
    pub right_most: bool,
    pub top_most: bool,
    pub bottom_most: bool,

    /// Highlight drawn while previewing this action.
    pub preview: Rect,
}

impl Default for DockContext {
    fn default() -> Self {
        Self {
            target: None,
            position: DockPosition::Center,
            tab_index: 0,
            amount: 0.5,
            magnet: Magnet::Middle,
            left_most: true,
            right_most: true,
            top_most: true,
            bottom_most: true,
            preview: Rect::ZERO,
        }
    }
}

impl DockContext {
    pub fn targeting(zone: NodeId, position: DockPosition) -> Self {
        Self {
            target: Some(zone),
            position,
            ..Default::default()
        }
    }

    /// Pick the default split size and anchor for an edge drop on a zone of size `rect`.
    ///
    /// The side touching the outer boundary wins: the new split gets a capped fixed size
    /// anchored to that edge. With no boundary flag set, the split stays at half/half.
    pub fn apply_edge_defaults(&mut self, rect: Rect, style: &DockStyle) {
        let (span, cap, near_most, far_most, near) = match self.position {
            DockPosition::Left => (
                rect.width(),
                style.default_side_width,
                self.left_most,
                self.right_most,
                Magnet::LEFT,
            ),
            DockPosition::Right => (
                rect.width(),
                style.default_side_width,
                self.right_most,
                self.left_most,
                Magnet::RIGHT,
            ),
            DockPosition::Top => (
                rect.height(),
                style.default_side_height,
                self.top_most,
                self.bottom_most,
                Magnet::TOP,
            ),
            DockPosition::Bottom => (
                rect.height(),
                style.default_side_height,
                self.bottom_most,
                self.top_most,
                Magnet::BOTTOM,
            ),
            DockPosition::Center | DockPosition::Tab => return,
        };

        if span <= 0.0 {
            return;
        }

        let amount = (span * 0.5).min(cap);
        if near_most {
            self.amount = amount;
            self.magnet = near;
        } else if far_most {
            self.amount = amount;
            self.magnet = near.opposite();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn zone_rect(w: f32, h: f32) -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(w, h))
    }

    #[test]
    fn left_edge_on_outer_boundary_is_capped_and_anchored_left() {
        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Left);
        ctx.apply_edge_defaults(zone_rect(1000.0, 600.0), &DockStyle::default());
        assert_eq!(ctx.amount, 300.0);
        assert_eq!(ctx.magnet, Magnet::LEFT);
    }

    #[test]
    fn small_zone_uses_half_the_span() {
        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Bottom);
        ctx.apply_edge_defaults(zone_rect(1000.0, 300.0), &DockStyle::default());
        assert_eq!(ctx.amount, 150.0);
        assert_eq!(ctx.magnet, Magnet::BOTTOM);
    }

    #[test]
    fn inner_edge_anchors_to_the_outer_side() {
        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Left);
        ctx.left_most = false;
        ctx.apply_edge_defaults(zone_rect(1000.0, 600.0), &DockStyle::default());
        assert_eq!(ctx.amount, 300.0);
        assert_eq!(ctx.magnet, Magnet::RIGHT);

        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Top);
        ctx.top_most = false;
        ctx.apply_edge_defaults(zone_rect(1000.0, 1000.0), &DockStyle::default());
        assert_eq!(ctx.amount, 200.0);
        assert_eq!(ctx.magnet, Magnet::BOTTOM);
    }

    #[test]
    fn enclosed_zone_keeps_percentage_split() {
        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Right);
        ctx.left_most = false;
        ctx.right_most = false;
        ctx.apply_edge_defaults(zone_rect(1000.0, 600.0), &DockStyle::default());
        assert_eq!(ctx.amount, 0.5);
        assert_eq!(ctx.magnet, Magnet::Middle);
    }

    #[test]
    fn unlaid_zone_keeps_percentage_split() {
        let mut ctx = DockContext::targeting(NodeId::from_raw(1), DockPosition::Right);
        ctx.apply_edge_defaults(Rect::ZERO, &DockStyle::default());
        assert_eq!(ctx.amount, 0.5);
        assert_eq!(ctx.magnet, Magnet::Middle);
    }
}
