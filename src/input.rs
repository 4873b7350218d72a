use egui::{Pos2, Rect};

/// Primary-button pointer state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Latest pointer position, `None` when the pointer is outside the dock surface.
    pub pos: Option<Pos2>,

    /// The button went down this frame.
    pub pressed: bool,

    /// The button is held.
    pub down: bool,

    /// The button went up this frame.
    pub released: bool,
}

impl PointerInput {
    pub fn hover(pos: Pos2) -> Self {
        Self {
            pos: Some(pos),
            ..Default::default()
        }
    }

    pub fn press(pos: Pos2) -> Self {
        Self {
            pos: Some(pos),
            pressed: true,
            down: true,
            released: false,
        }
    }

    pub fn drag(pos: Pos2) -> Self {
        Self {
            pos: Some(pos),
            pressed: false,
            down: true,
            released: false,
        }
    }

    pub fn release(pos: Pos2) -> Self {
        Self {
            pos: Some(pos),
            pressed: false,
            down: false,
            released: true,
        }
    }

    /// Read the primary button from an `egui` input state.
    pub fn from_egui(input: &egui::InputState) -> Self {
        Self {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
        }
    }

    pub(crate) fn pressed_in(&self, rect: Rect) -> bool {
        self.pressed && self.pos.is_some_and(|p| rect.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn press_only_counts_inside_rect() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert!(PointerInput::press(pos2(5.0, 5.0)).pressed_in(rect));
        assert!(!PointerInput::press(pos2(15.0, 5.0)).pressed_in(rect));
        assert!(!PointerInput::hover(pos2(5.0, 5.0)).pressed_in(rect));
        assert!(!PointerInput::default().pressed_in(rect));
    }
}
