use crate::dock::render::{FramePass, FrameRequests};
use crate::dock::{
    DockContext, DockNode, NodeId, SplitAxis, amount_from_split_pos, clamp_split_pos, split_bar,
};
use crate::draw::{DrawList, TextMeasure};
use crate::input::PointerInput;
use crate::panel::{PanelId, Panels};

use super::{Interaction, PanelsManager};

/// What happened during one [`PanelsManager::render`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutput {
    /// Panels whose tab close glyph was pressed. They are no longer docked.
    pub closed: Vec<PanelId>,

    /// The tree or a split position changed and was laid out again.
    pub layout_changed: bool,

    /// Something visible changed (or a drag is running) and another frame should be drawn.
    pub needs_redraw: bool,
}

impl PanelsManager {
    /// Draw the layout into `out` and run this frame's docking interaction.
    ///
    /// The tree is walked first without structural changes. Afterwards at most one drop is
    /// committed, then every recorded tab close is applied with a single clean pass.
    pub fn render(
        &mut self,
        panels: &mut Panels,
        pointer: PointerInput,
        measure: &dyn TextMeasure,
        out: &mut DrawList,
    ) -> FrameOutput {
        self.dropped_panel = false;
        self.dropped_split = false;
        self.closed_panel = false;

        self.interaction.follow(&pointer, self.style.drag_threshold);
        let dropping = self.interaction.drops(&pointer);

        let requests = {
            let mut pass = FramePass {
                panels: &*panels,
                style: &self.style,
                pointer,
                accept_presses: self.interaction.is_idle(),
                out: &mut *out,
                requests: FrameRequests::default(),
            };
            self.tree.render(self.root, &mut pass);
            pass.requests
        };

        let mut output = FrameOutput {
            needs_redraw: requests.activated,
            ..Default::default()
        };

        match self.interaction {
            Interaction::DraggingPanel { panel } => {
                let ctx = self.drop_target(panels, &pointer);
                if dropping {
                    self.interaction = Interaction::Idle;
                    if let Some(ctx) = ctx.filter(|_| panels.contains(panel)) {
                        self.commit_panel_drop(panel, &ctx);
                        self.relayout(panels, measure);
                        output.layout_changed = true;
                    } else {
                        log::trace!("drag of {panel:?} released outside the dock");
                    }
                    output.needs_redraw = true;
                } else if let Some(ctx) = ctx {
                    out.rect(ctx.preview, self.style.dock_color);
                }
            }
            Interaction::DraggingSplit { split } => {
                let resize = self.split_drag(split, &pointer);
                if dropping {
                    self.interaction = Interaction::Idle;
                    if let Some(amount) = resize.map(|(amount, _)| amount) {
                        self.commit_split_resize(split, amount);
                        self.relayout(panels, measure);
                        output.layout_changed = true;
                    }
                    output.needs_redraw = true;
                } else if let Some((_, bar)) = resize {
                    out.rect(bar, self.style.dock_color);
                } else {
                    log::debug!("dragged split {split:?} no longer exists");
                    self.interaction = Interaction::Idle;
                }
            }
            Interaction::Idle | Interaction::TabPressed { .. } => {}
        }

        self.interaction
            .arm(requests.pressed_split, requests.pressed_tab, &pointer);

        if !requests.closed.is_empty() {
            for &panel in &requests.closed {
                self.undock_panel(panel);
            }
            self.clean_dock();
            self.relayout(panels, measure);
            self.closed_panel = true;
            output.closed = requests.closed;
            output.layout_changed = true;
        }

        output.needs_redraw |= output.layout_changed || self.is_interacting();
        output
    }

    /// Where the dragged panel would land, if the pointer is over the dock.
    fn drop_target(&self, panels: &Panels, pointer: &PointerInput) -> Option<DockContext> {
        let pos = pointer.pos?;
        let root = self.tree.get(self.root)?;
        if !root.rect().contains(pos) {
            return None;
        }
        let mut ctx = DockContext::default();
        self.tree.dock(self.root, pos, &mut ctx, panels, &self.style);
        ctx.target.map(|_| ctx)
    }

    fn commit_panel_drop(&mut self, panel: PanelId, ctx: &DockContext) {
        log::debug!("dropping {panel:?} at {:?} of {:?}", ctx.position, ctx.target);
        self.undock_panel(panel);
        let root = self.tree.dock_panel(self.root, panel, ctx);
        self.root = root;
        self.clean_dock();
        self.dropped_panel = true;
    }

    /// The amount a drop would store for `split` and the preview bar for it.
    fn split_drag(&self, split: NodeId, pointer: &PointerInput) -> Option<(f32, egui::Rect)> {
        let (axis, node) = self.tree.get(split).and_then(DockNode::as_split)?;
        let rect = node.rect();
        let span = axis.span(rect);
        let pos = match pointer.pos {
            Some(pos) => match axis {
                SplitAxis::Horizontal => pos.x - rect.min.x,
                SplitAxis::Vertical => pos.y - rect.min.y,
            },
            None => node.split_pos(axis),
        };
        let pos = clamp_split_pos(pos, span, axis.min_size(&self.style));
        let bar = split_bar(rect, axis, pos, self.style.panel_padding);
        Some((amount_from_split_pos(pos, node.magnet, span), bar))
    }

    fn commit_split_resize(&mut self, split: NodeId, amount: f32) {
        if let Some((_, node)) = self.tree.get_mut(split).and_then(DockNode::as_split_mut) {
            log::debug!("split {split:?} amount {} -> {amount}", node.amount);
            node.amount = amount;
            self.dropped_split = true;
        }
    }
}
