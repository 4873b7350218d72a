use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::dock::DockPosition;
use crate::draw::{DrawList, TextMeasure};
use crate::input::PointerInput;
use crate::manager::PanelsManager;
use crate::panel::{Panel, PanelId, Panels};
use crate::style::DockStyle;

/// Host-facing owner of one docking surface.
///
/// Feed it window events, call [`Self::render`] once per frame and replay the returned
/// [`DrawList`] when there is one.
#[derive(Debug)]
pub struct Context {
    manager: PanelsManager,
    panels: Panels,

    /// Panels handed to [`Self::add`] that have not been removed or closed since.
    added: Vec<PanelId>,

    size: Vec2,
    pointer: PointerInput,
    dirty: bool,
    layout_invalid: bool,
    closed: Vec<PanelId>,
    draw_list: DrawList,
}

impl Context {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_manager(PanelsManager::new(), width, height)
    }

    /// A context around a prepared layout, e.g. from [`crate::DockBuilder::finish`].
    pub fn with_manager(manager: PanelsManager, width: f32, height: f32) -> Self {
        Self {
            manager,
            panels: Panels::new(),
            added: Vec::new(),
            size: vec2(width, height),
            pointer: PointerInput::default(),
            dirty: true,
            layout_invalid: true,
            closed: Vec::new(),
            draw_list: DrawList::default(),
        }
    }

    /// Register a panel. It stays invisible until passed to [`Self::add`].
    pub fn create_panel(&mut self, panel: Panel) -> PanelId {
        self.panels.insert(panel)
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id)
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn manager(&self) -> &PanelsManager {
        &self.manager
    }

    /// Panels currently shown, in the order they were added.
    pub fn added_panels(&self) -> &[PanelId] {
        &self.added
    }

    /// Show `panel`, docked next to `dock_parent` (or in the documents zone without one).
    ///
    /// Unknown panels and panels that were already added are ignored.
    pub fn add(&mut self, panel: PanelId, dock_parent: Option<PanelId>, position: DockPosition) {
        if !self.panels.contains(panel) || self.added.contains(&panel) {
            log::debug!("ignoring add of unknown or already added {panel:?}");
            return;
        }
        self.added.push(panel);
        self.manager.add_panel(panel, dock_parent, position);
        self.invalidate_layout();
    }

    /// Take `panel` out of the layout. The panel stays registered.
    pub fn remove(&mut self, panel: PanelId) -> bool {
        let Some(index) = self.added.iter().position(|&p| p == panel) else {
            return false;
        };
        self.added.remove(index);
        self.manager.remove_panel(panel);
        self.invalidate_layout();
        true
    }

    pub fn style(&self) -> &DockStyle {
        &self.manager.style
    }

    pub fn set_style(&mut self, style: DockStyle) {
        self.manager.style = style;
        self.invalidate_layout();
    }

    /// Force the next [`Self::render`] to produce a frame.
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Lay the tree out again before the next frame.
    pub fn invalidate_layout(&mut self) {
        self.layout_invalid = true;
        self.dirty = true;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Relayout happens only if the size actually changed.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        let size = vec2(width, height);
        if size != self.size {
            log::trace!("resize {:?} -> {size:?}", self.size);
            self.size = size;
            self.invalidate_layout();
        }
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.pointer.pos = Some(pos2(x, y));
        if self.manager.is_interacting() {
            self.dirty = true;
        }
    }

    /// Only button 0 drives docking.
    pub fn on_mouse_button_down(&mut self, button: u32) {
        if button == 0 {
            self.pointer.pressed = true;
            self.pointer.down = true;
            self.dirty = true;
        }
    }

    pub fn on_mouse_button_up(&mut self, button: u32) {
        if button == 0 {
            self.pointer.released = true;
            self.pointer.down = false;
            self.dirty = true;
        }
    }

    /// Swap in a prepared layout, e.g. from [`crate::DockBuilder::finish`] built with panels
    /// created here. Docked panels that are not registered are dropped.
    pub fn set_layout(&mut self, mut manager: PanelsManager) {
        let stale: Vec<PanelId> = docked_panels(&manager)
            .into_iter()
            .filter(|&panel| !self.panels.contains(panel))
            .collect();
        for &panel in &stale {
            log::warn!("layout references unregistered {panel:?}");
            manager.remove_panel(panel);
        }
        self.manager = manager;
        self.sync_added();
        self.invalidate_layout();
    }

    fn sync_added(&mut self) {
        self.added = docked_panels(&self.manager);
    }

    fn viewport(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }

    /// Produce this frame's draw list, or `None` when nothing changed since the last one.
    pub fn render(&mut self, measure: &dyn TextMeasure) -> Option<&DrawList> {
        let viewport = self.viewport();
        if self.layout_invalid {
            self.manager
                .update_layout(viewport, &mut self.panels, measure);
            self.layout_invalid = false;
            self.dirty = true;
        }

        self.dirty |= self.panels.take_dirty();
        if !self.dirty {
            return None;
        }
        self.dirty = false;

        self.draw_list.clear();
        self.draw_list
            .rect(viewport, self.manager.style.window_color);
        let output = self.manager.render(
            &mut self.panels,
            self.pointer,
            measure,
            &mut self.draw_list,
        );

        if !output.closed.is_empty() {
            self.added.retain(|panel| !output.closed.contains(panel));
            self.closed.extend_from_slice(&output.closed);
        }

        // Layout sinks touched by this frame's own relayout are already drawn.
        self.panels.take_dirty();
        self.pointer.pressed = false;
        self.pointer.released = false;

        Some(&self.draw_list)
    }

    /// Panels closed from their tab since the last call.
    pub fn take_closed_panels(&mut self) -> Vec<PanelId> {
        std::mem::take(&mut self.closed)
    }

    #[cfg(feature = "serde")]
    pub fn snapshot(&self) -> crate::dock::LayoutSnapshot {
        self.manager.snapshot()
    }

    /// Restore a layout captured with [`Self::snapshot`]. Panels it names that are not
    /// registered here are dropped.
    ///
    /// # Errors
    /// See [`PanelsManager::restore`].
    #[cfg(feature = "serde")]
    pub fn restore(
        &mut self,
        snapshot: &crate::dock::LayoutSnapshot,
    ) -> Result<(), crate::dock::LayoutSnapshotError> {
        self.manager.restore(snapshot, &self.panels)?;
        self.sync_added();
        self.invalidate_layout();
        Ok(())
    }
}

/// Every docked panel, depth first.
fn docked_panels(manager: &PanelsManager) -> Vec<PanelId> {
    let tree = manager.tree();
    let mut out = Vec::new();
    let mut stack = vec![manager.root()];
    while let Some(id) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        if let Some(zone) = node.as_zone() {
            out.extend(zone.panels());
        } else if let Some([first, second]) = node.children() {
            stack.push(second);
            stack.push(first);
        }
    }
    out
}
