use egui::Pos2;

use crate::dock::NodeId;
use crate::input::PointerInput;
use crate::panel::PanelId;

/// The single pointer interaction the manager tracks across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum Interaction {
    #[default]
    Idle,

    /// A tab was pressed but has not moved far enough to become a drag.
    TabPressed { panel: PanelId, origin: Pos2 },

    DraggingPanel { panel: PanelId },
    DraggingSplit { split: NodeId },
}

impl Interaction {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub(crate) fn dragging_panel(&self) -> Option<PanelId> {
        match self {
            Self::DraggingPanel { panel } => Some(*panel),
            Self::Idle | Self::TabPressed { .. } | Self::DraggingSplit { .. } => None,
        }
    }

    pub(crate) fn dragging_split(&self) -> Option<NodeId> {
        match self {
            Self::DraggingSplit { split } => Some(*split),
            Self::Idle | Self::TabPressed { .. } | Self::DraggingPanel { .. } => None,
        }
    }

    /// Whether `panel` is pressed or being dragged.
    pub(crate) fn involves(&self, panel: PanelId) -> bool {
        match self {
            Self::TabPressed { panel: p, .. } | Self::DraggingPanel { panel: p } => *p == panel,
            Self::Idle | Self::DraggingSplit { .. } => false,
        }
    }

    /// Promote a pressed tab to a drag once the pointer moved more than `drag_threshold`, or
    /// forget the press if the button went up first.
    pub(crate) fn follow(&mut self, pointer: &PointerInput, drag_threshold: f32) {
        let Self::TabPressed { panel, origin } = *self else {
            return;
        };

        if !pointer.down {
            log::trace!("tab press on {panel:?} released in place");
            *self = Self::Idle;
        } else if pointer
            .pos
            .is_some_and(|pos| pos.distance(origin) > drag_threshold)
        {
            log::trace!("start dragging {panel:?}");
            *self = Self::DraggingPanel { panel };
        }
    }

    /// Whether a running drag ends with this frame's pointer.
    pub(crate) fn drops(&self, pointer: &PointerInput) -> bool {
        !pointer.down && matches!(self, Self::DraggingPanel { .. } | Self::DraggingSplit { .. })
    }

    /// Arm a new interaction from presses gathered during the tree walk. Handles take
    /// precedence over tabs.
    pub(crate) fn arm(
        &mut self,
        pressed_split: Option<NodeId>,
        pressed_tab: Option<PanelId>,
        pointer: &PointerInput,
    ) {
        if !self.is_idle() {
            return;
        }
        if let Some(split) = pressed_split {
            log::trace!("start dragging split {split:?}");
            *self = Self::DraggingSplit { split };
        } else if let (Some(panel), Some(origin)) = (pressed_tab, pointer.pos) {
            log::trace!("tab pressed on {panel:?}");
            *self = Self::TabPressed { panel, origin };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const THRESHOLD: f32 = 4.0;

    fn pressed() -> Interaction {
        let mut interaction = Interaction::Idle;
        interaction.arm(
            None,
            Some(PanelId::from_raw(1)),
            &PointerInput::press(pos2(10.0, 10.0)),
        );
        interaction
    }

    #[test]
    fn small_moves_do_not_start_a_drag() {
        let mut interaction = pressed();
        interaction.follow(&PointerInput::drag(pos2(12.0, 12.0)), THRESHOLD);
        assert!(matches!(interaction, Interaction::TabPressed { .. }));

        interaction.follow(&PointerInput::drag(pos2(20.0, 10.0)), THRESHOLD);
        assert_eq!(interaction.dragging_panel(), Some(PanelId::from_raw(1)));
    }

    #[test]
    fn release_in_place_returns_to_idle() {
        let mut interaction = pressed();
        interaction.follow(&PointerInput::release(pos2(10.0, 10.0)), THRESHOLD);
        assert!(interaction.is_idle());
    }

    #[test]
    fn only_one_interaction_at_a_time() {
        let mut interaction = Interaction::DraggingPanel {
            panel: PanelId::from_raw(1),
        };
        interaction.arm(
            Some(NodeId::from_raw(3)),
            None,
            &PointerInput::press(pos2(0.0, 0.0)),
        );
        assert_eq!(interaction.dragging_split(), None);
        assert!(interaction.drops(&PointerInput::release(pos2(0.0, 0.0))));
        assert!(!interaction.drops(&PointerInput::drag(pos2(0.0, 0.0))));
    }

    #[test]
    fn pressed_and_dragged_tabs_involve_their_panel() {
        let mut interaction = pressed();
        assert!(interaction.involves(PanelId::from_raw(1)));
        assert!(!interaction.involves(PanelId::from_raw(2)));

        interaction.follow(&PointerInput::drag(pos2(30.0, 10.0)), THRESHOLD);
        assert!(interaction.involves(PanelId::from_raw(1)));
        let split = Interaction::DraggingSplit {
            split: NodeId::from_raw(3),
        };
        assert!(!split.involves(PanelId::from_raw(1)));
    }

    #[test]
    fn handles_win_over_tabs() {
        let mut interaction = Interaction::Idle;
        interaction.arm(
            Some(NodeId::from_raw(3)),
            Some(PanelId::from_raw(1)),
            &PointerInput::press(pos2(0.0, 0.0)),
        );
        assert_eq!(interaction.dragging_split(), Some(NodeId::from_raw(3)));
    }
}
