//! Tabbed leaf zones of the dock tree.

use egui::Rect;

use crate::panel::PanelId;

/// Leaf of the dock tree: a tabbed stack of panels.
///
/// Slots keep insertion (= tab) order. Undocking leaves a tombstone so indices stay stable
/// for the rest of the frame; [`Zone::compact`] removes them during the clean pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    slots: Vec<Option<PanelId>>,
    active: usize,
    rect: Rect,
}

impl Default for Zone {
    fn default() -> Self {
        Self::from_slots(Vec::new(), 0)
    }
}

impl Zone {
    pub fn new(panels: Vec<PanelId>, active: usize) -> Self {
        let active = active.min(panels.len().saturating_sub(1));
        Self {
            slots: panels.into_iter().map(Some).collect(),
            active,
            rect: Rect::ZERO,
        }
    }

    /// Zone with tombstones already in place; they go away on the next clean pass.
    pub(crate) fn from_slots(slots: Vec<Option<PanelId>>, active: usize) -> Self {
        let active = active.min(slots.len().saturating_sub(1));
        Self {
            slots,
            active,
            rect: Rect::ZERO,
        }
    }

    pub fn with_panel(panel: PanelId) -> Self {
        Self::new(vec![panel], 0)
    }

    /// Docked panels in tab order, tombstones skipped.
    pub fn panels(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Raw slots, including tombstones left by undocking.
    pub fn slots(&self) -> &[Option<PanelId>] {
        &self.slots
    }

    /// Number of docked panels.
    pub fn len(&self) -> usize {
        self.panels().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> Option<PanelId> {
        self.slots.get(self.active).copied().flatten()
    }

    /// Activate the tab at slot `index`. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.slots.len() && index != self.active {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Rect assigned by the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn position(&self, panel: PanelId) -> Option<usize> {
        self.slots.iter().position(|&slot| slot == Some(panel))
    }

    pub fn contains(&self, panel: PanelId) -> bool {
        self.position(panel).is_some()
    }

    /// Append and activate.
    pub(crate) fn push(&mut self, panel: PanelId) {
        self.slots.push(Some(panel));
        self.active = self.slots.len() - 1;
    }

    /// Insert at slot `index` (clamped to the end) and activate.
    pub(crate) fn insert(&mut self, index: usize, panel: PanelId) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, Some(panel));
        self.active = index;
    }

    /// Replace the slot holding `panel` with a tombstone.
    pub(crate) fn tombstone(&mut self, panel: PanelId) -> bool {
        match self.position(panel) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    /// Drop tombstones. The active tab stays on the same panel when it survives, otherwise
    /// moves to the next surviving tab (or the last one).
    pub(crate) fn compact(&mut self) {
        let before_active = self.slots[..self.active.min(self.slots.len())]
            .iter()
            .filter(|slot| slot.is_some())
            .count();
        self.slots.retain(Option::is_some);
        self.active = before_active.min(self.slots.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<PanelId> {
        (1..=n).map(PanelId::from_raw).collect()
    }

    #[test]
    fn default_zone_is_empty_and_unplaced() {
        let zone = Zone::default();
        assert!(zone.is_empty());
        assert_eq!(zone.active_panel(), None);
        assert_eq!(zone.rect(), Rect::ZERO);
    }

    fn assert_active_in_range(zone: &Zone) {
        if !zone.is_empty() {
            assert!(zone.active_index() < zone.slots().len(), "{zone:?}");
        }
    }

    #[test]
    fn new_clamps_active() {
        let zone = Zone::new(ids(2), 7);
        assert_eq!(zone.active_index(), 1);
        let zone = Zone::new(Vec::new(), 3);
        assert_eq!(zone.active_index(), 0);
        assert!(zone.is_empty());
    }

    #[test]
    fn tombstones_keep_indices_until_compacted() {
        let p = ids(3);
        let mut zone = Zone::new(p.clone(), 0);
        assert!(zone.tombstone(p[1]));
        assert_eq!(zone.slots(), &[Some(p[0]), None, Some(p[2])]);
        assert_eq!(zone.position(p[2]), Some(2));

        zone.compact();
        assert_eq!(zone.slots(), &[Some(p[0]), Some(p[2])]);
        assert_eq!(zone.position(p[2]), Some(1));
    }

    #[test]
    fn compact_keeps_surviving_active_panel() {
        let p = ids(4);
        let mut zone = Zone::new(p.clone(), 2);
        zone.tombstone(p[0]);
        zone.compact();
        assert_eq!(zone.active_panel(), Some(p[2]));
    }

    #[test]
    fn compact_moves_active_to_next_tab_when_removed() {
        let p = ids(3);
        let mut zone = Zone::new(p.clone(), 1);
        zone.tombstone(p[1]);
        zone.compact();
        assert_eq!(zone.active_panel(), Some(p[2]));

        let mut zone = Zone::new(p.clone(), 2);
        zone.tombstone(p[2]);
        zone.compact();
        assert_eq!(zone.active_panel(), Some(p[1]));
        assert_active_in_range(&zone);
    }

    #[test]
    fn insert_is_clamped_and_activates() {
        let p = ids(3);
        let mut zone = Zone::new(vec![p[0]], 0);
        zone.insert(10, p[1]);
        assert_eq!(zone.panels().collect::<Vec<_>>(), vec![p[0], p[1]]);
        assert_eq!(zone.active_panel(), Some(p[1]));
        zone.insert(0, p[2]);
        assert_eq!(zone.panels().collect::<Vec<_>>(), vec![p[2], p[0], p[1]]);
        assert_eq!(zone.active_index(), 0);
    }

    #[test]
    fn tombstoning_an_absent_panel_is_a_noop() {
        let p = ids(2);
        let mut zone = Zone::new(vec![p[0]], 0);
        assert!(!zone.tombstone(p[1]));
        assert_eq!(zone.len(), 1);
    }

    #[test]
    fn set_active_ignores_out_of_range() {
        let mut zone = Zone::new(ids(2), 0);
        assert!(!zone.set_active(5));
        assert!(zone.set_active(1));
        assert!(!zone.set_active(1));
    }
}
