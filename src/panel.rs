use egui::Rect;

/// Stable handle to a [`Panel`] stored in a [`Panels`] registry.
///
/// The dock tree only ever stores these handles, never the panel itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PanelId(u64);

impl PanelId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque handle to a control owned by the host application.
///
/// Controls lay themselves out inside [`Panel::client_rect`]; the dock only keeps their order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlId(pub u64);

/// An application dockable window: document view, inspector, timeline, …
#[derive(Clone, Debug)]
pub struct Panel {
    title: String,
    closable: bool,
    controls: Vec<ControlId>,
    tab_rect: Rect,
    client_rect: Rect,
    scroll_offset: f32,
    dirty: bool,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            closable: false,
            controls: Vec::new(),
            tab_rect: Rect::ZERO,
            client_rect: Rect::ZERO,
            scroll_offset: 0.0,
            dirty: true,
        }
    }

    /// Show a close glyph on this panel's tab.
    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Title shown in the tab bar. Long titles are clipped by the zone.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.dirty = true;
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    pub fn set_closable(&mut self, closable: bool) {
        self.closable = closable;
        self.dirty = true;
    }

    /// Controls in draw/alignment order.
    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    pub fn clear(&mut self) {
        if self.controls.is_empty() {
            return;
        }
        self.controls.clear();
        self.update_layout(self.client_rect);
    }

    pub fn add(&mut self, control: ControlId) {
        self.controls.push(control);
        self.update_layout(self.client_rect);
    }

    /// Insert `control` before `before`. Appends if `before` is not in this panel.
    pub fn insert_before(&mut self, control: ControlId, before: ControlId) {
        let index = self
            .controls
            .iter()
            .position(|&c| c == before)
            .unwrap_or(self.controls.len());
        self.controls.insert(index, control);
        self.update_layout(self.client_rect);
    }

    /// Insert `control` after `after`. Appends if `after` is not in this panel.
    pub fn insert_after(&mut self, control: ControlId, after: ControlId) {
        let index = self
            .controls
            .iter()
            .position(|&c| c == after)
            .map_or(self.controls.len(), |i| i + 1);
        self.controls.insert(index, control);
        self.update_layout(self.client_rect);
    }

    /// Remove the first occurrence of `control`. No-op if absent.
    pub fn remove(&mut self, control: ControlId) {
        if let Some(index) = self.controls.iter().position(|&c| c == control) {
            self.controls.remove(index);
            self.update_layout(self.client_rect);
        }
    }

    /// Layout sink called by the owning zone with the content rect.
    pub fn update_layout(&mut self, rect: Rect) {
        self.dirty = true;
        self.client_rect = rect;
    }

    pub fn client_rect(&self) -> Rect {
        self.client_rect
    }

    /// The tab header rect from the last layout pass. [`Rect::ZERO`] when clipped.
    pub fn tab_rect(&self) -> Rect {
        self.tab_rect
    }

    pub(crate) fn set_tab_rect(&mut self, rect: Rect) {
        if self.tab_rect != rect {
            self.tab_rect = rect;
            self.dirty = true;
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Registry owning every [`Panel`] known to the host, docked or not.
///
/// Membership in the dock tree is decided by the tree alone; use
/// [`crate::PanelsManager::find`] to learn where (or whether) a panel is docked.
#[derive(Debug, Default)]
pub struct Panels {
    panels: ahash::HashMap<PanelId, Panel>,
    next_id: u64,
}

impl Panels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, panel: Panel) -> PanelId {
        self.next_id += 1;
        let id = PanelId(self.next_id);
        self.panels.insert(id, panel);
        id
    }

    pub fn remove(&mut self, id: PanelId) -> Option<Panel> {
        self.panels.remove(&id)
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(&id)
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.panels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Title for `id`, or an empty string for unknown handles.
    pub fn title(&self, id: PanelId) -> &str {
        self.panels.get(&id).map_or("", |p| p.title())
    }

    pub fn is_closable(&self, id: PanelId) -> bool {
        self.panels.get(&id).is_some_and(|p| p.closable)
    }

    /// Returns true if any panel changed since the last call, clearing every dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        self.panels
            .values_mut()
            .fold(false, |any, panel| std::mem::take(&mut panel.dirty) || any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ControlId = ControlId(1);
    const B: ControlId = ControlId(2);
    const C: ControlId = ControlId(3);
    const D: ControlId = ControlId(4);

    #[test]
    fn controls_follow_operation_order() {
        let mut panel = Panel::new("Inspector");
        panel.add(A);
        panel.add(C);
        panel.insert_before(B, C);
        panel.insert_after(D, C);
        assert_eq!(panel.controls(), &[A, B, C, D]);

        panel.remove(B);
        assert_eq!(panel.controls(), &[A, C, D]);

        panel.insert_before(B, A);
        assert_eq!(panel.controls(), &[B, A, C, D]);
    }

    #[test]
    fn insert_relative_to_missing_control_appends() {
        let mut panel = Panel::new("Inspector");
        panel.add(A);
        panel.insert_before(B, ControlId(99));
        panel.insert_after(C, ControlId(99));
        assert_eq!(panel.controls(), &[A, B, C]);
    }

    #[test]
    fn remove_missing_control_is_a_noop() {
        let mut panel = Panel::new("Inspector");
        panel.add(A);
        panel.remove(B);
        assert_eq!(panel.controls(), &[A]);
    }

    #[test]
    fn content_edits_mark_registry_dirty() {
        let mut panels = Panels::new();
        let id = panels.insert(Panel::new("Timeline"));
        assert!(panels.take_dirty());
        assert!(!panels.take_dirty());

        panels.get_mut(id).unwrap().add(A);
        assert!(panels.take_dirty());

        panels.get_mut(id).unwrap().clear();
        assert!(panels.take_dirty());

        // Clearing an empty panel changes nothing.
        panels.get_mut(id).unwrap().clear();
        assert!(!panels.take_dirty());
    }

    #[test]
    fn unknown_handles_are_harmless() {
        let mut panels = Panels::new();
        let id = panels.insert(Panel::new("Console").closable(true));
        assert!(panels.is_closable(id));
        assert_eq!(panels.title(id), "Console");

        let gone = panels.remove(id);
        assert!(gone.is_some());
        assert_eq!(panels.title(id), "");
        assert!(!panels.is_closable(id));
        assert!(panels.get_mut(id).is_none());
    }
}
