use egui::{Align2, pos2};

use super::geometry;
use super::tree::{DockNode, DockTree, NodeId};
use super::zone::Zone;
use crate::draw::DrawList;
use crate::input::PointerInput;
use crate::panel::{PanelId, Panels};
use crate::style::DockStyle;

const CLOSE_GLYPH: &str = "×";

/// Requests gathered while walking the tree. Nothing structural changes during the walk;
/// the manager applies these afterwards.
#[derive(Debug, Default)]
pub(crate) struct FrameRequests {
    /// Close glyphs pressed this frame, in walk order.
    pub closed: Vec<PanelId>,

    /// A tab body pressed this frame (a possible drag start).
    pub pressed_tab: Option<PanelId>,

    /// A split handle pressed this frame.
    pub pressed_split: Option<NodeId>,

    /// A press switched the active tab of some zone.
    pub activated: bool,
}

pub(crate) struct FramePass<'a> {
    pub panels: &'a Panels,
    pub style: &'a DockStyle,
    pub pointer: PointerInput,

    /// Presses are only routed to tabs and handles when no drag is running.
    pub accept_presses: bool,
    pub out: &'a mut DrawList,
    pub requests: FrameRequests,
}

impl FramePass<'_> {
    fn pressed_in(&self, rect: egui::Rect) -> bool {
        self.accept_presses && self.pointer.pressed_in(rect)
    }
}

impl DockTree {
    /// Depth-first draw of the subtree at `id`.
    pub(crate) fn render(&mut self, id: NodeId, pass: &mut FramePass<'_>) {
        let Some(node) = self.get_mut(id) else {
            return;
        };

        match node {
            DockNode::Zone(zone) => render_zone(zone, None, pass),
            DockNode::KeepAround { zone, placeholder } => {
                render_zone(zone, Some(placeholder.as_str()), pass);
            }
            DockNode::HSplit(split) | DockNode::VSplit(split) => {
                let (first, second) = (split.first, split.second);
                if let Some((axis, split)) = self.get(id).and_then(DockNode::as_split) {
                    let bar = geometry::split_bar(
                        split.rect(),
                        axis,
                        split.split_pos(axis),
                        pass.style.panel_margin,
                    );
                    pass.out.rect(bar, pass.style.separator_color);
                    if pass.pressed_in(bar) {
                        pass.requests.pressed_split = Some(id);
                    }
                }
                self.render(first, pass);
                self.render(second, pass);
            }
        }
    }
}

fn render_zone(zone: &mut Zone, placeholder: Option<&str>, pass: &mut FramePass<'_>) {
    let style = pass.style;

    if zone.is_empty() {
        if let Some(text) = placeholder {
            pass.out.text(
                zone.rect().center(),
                Align2::CENTER_CENTER,
                text,
                style.disabled_text_color,
            );
        }
        return;
    }

    let (strip, content) = geometry::tab_strip_and_content(zone.rect(), style.control_height);
    pass.out.rect(content, style.panel_color);

    if let Some(active) = zone.active_panel() {
        let inner = content.shrink(style.panel_padding);
        pass.out.scissor(inner);
        pass.out.panel_content(active, inner);
        pass.out.reset_scissor();
    }

    pass.out.scissor(strip);
    let slots = zone.slots().to_vec();
    for (index, slot) in slots.into_iter().enumerate() {
        let Some(id) = slot else {
            continue;
        };
        let Some(panel) = pass.panels.get(id) else {
            continue;
        };
        let tab = panel.tab_rect();
        if tab.width() <= 0.0 {
            break;
        }

        let is_active = index == zone.active_index();
        let (fill, text_color) = if is_active {
            (style.panel_color, style.text_color)
        } else {
            (style.inactive_tab_color, style.disabled_text_color)
        };
        pass.out.rect(tab, fill);
        pass.out.text(
            pos2(tab.min.x + style.tab_padding, tab.center().y),
            Align2::LEFT_CENTER,
            panel.title(),
            text_color,
        );

        let close = panel
            .is_closable()
            .then(|| geometry::close_glyph_rect(tab, style));
        if let Some(close) = close {
            pass.out
                .text(close.center(), Align2::CENTER_CENTER, CLOSE_GLYPH, text_color);
        }

        if !pass.pressed_in(tab) {
            continue;
        }
        if close.is_some_and(|close| pass.pressed_in(close)) {
            pass.requests.closed.push(id);
        } else {
            if zone.set_active(index) {
                pass.requests.activated = true;
            }
            pass.requests.pressed_tab = Some(id);
        }
    }
    pass.out.reset_scissor();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, MonospaceMeasure};
    use crate::panel::Panel;
    use egui::{Rect, vec2};

    struct Fixture {
        tree: DockTree,
        root: NodeId,
        panels: Panels,
        style: DockStyle,
    }

    fn fixture(titles: &[(&str, bool)]) -> (Fixture, Vec<PanelId>) {
        let mut panels = Panels::new();
        let ids: Vec<PanelId> = titles
            .iter()
            .map(|(title, closable)| panels.insert(Panel::new(*title).closable(*closable)))
            .collect();
        let mut tree = DockTree::new();
        let root = tree.insert(DockNode::Zone(Zone::new(ids.clone(), 0)));
        let style = DockStyle::default();
        tree.update_layout(
            root,
            Rect::from_min_size(pos2(0.0, 0.0), vec2(600.0, 400.0)),
            &mut panels,
            &style,
            &MonospaceMeasure::default(),
        );
        (
            Fixture {
                tree,
                root,
                panels,
                style,
            },
            ids,
        )
    }

    fn run(f: &mut Fixture, pointer: PointerInput) -> (DrawList, FrameRequests) {
        let mut out = DrawList::default();
        let mut pass = FramePass {
            panels: &f.panels,
            style: &f.style,
            pointer,
            accept_presses: true,
            out: &mut out,
            requests: FrameRequests::default(),
        };
        f.tree.render(f.root, &mut pass);
        let requests = pass.requests;
        (out, requests)
    }

    #[test]
    fn only_the_active_panel_gets_content() {
        let (mut f, ids) = fixture(&[("One", false), ("Two", false)]);
        let (out, _) = run(&mut f, PointerInput::default());
        let contents: Vec<_> = out.panel_contents().map(|(id, _)| id).collect();
        assert_eq!(contents, vec![ids[0]]);
    }

    #[test]
    fn pressing_an_inactive_tab_activates_it_and_arms_a_drag() {
        let (mut f, ids) = fixture(&[("One", false), ("Two", false)]);
        let tab = f.panels.get(ids[1]).map(Panel::tab_rect).unwrap_or(Rect::ZERO);
        let (_, requests) = run(&mut f, PointerInput::press(tab.center()));
        assert!(requests.activated);
        assert_eq!(requests.pressed_tab, Some(ids[1]));
        assert_eq!(f.tree.zone(f.root).map(Zone::active_index), Some(1));
    }

    #[test]
    fn close_glyph_records_without_mutating() {
        let (mut f, ids) = fixture(&[("One", true), ("Two", true)]);
        let tab = f.panels.get(ids[0]).map(Panel::tab_rect).unwrap_or(Rect::ZERO);
        let glyph = geometry::close_glyph_rect(tab, &f.style);
        let (_, requests) = run(&mut f, PointerInput::press(glyph.center()));
        assert_eq!(requests.closed, vec![ids[0]]);
        assert_eq!(requests.pressed_tab, None);
        assert_eq!(f.tree.zone(f.root).map(Zone::len), Some(2));
    }

    #[test]
    fn empty_keep_around_draws_its_placeholder() {
        let mut tree = DockTree::new();
        let root = tree.insert(DockNode::keep_around("Nothing open"));
        let panels = Panels::new();
        let style = DockStyle::default();
        let mut out = DrawList::default();
        let mut pass = FramePass {
            panels: &panels,
            style: &style,
            pointer: PointerInput::default(),
            accept_presses: true,
            out: &mut out,
            requests: FrameRequests::default(),
        };
        tree.render(root, &mut pass);
        assert!(matches!(
            out.commands(),
            [DrawCommand::Text { text, .. }] if text == "Nothing open"
        ));
    }
}
