use egui::{Align2, Color32, FontId, Painter, Pos2, Rect};

use crate::panel::PanelId;

/// Measures the rendered width of a tab title.
///
/// Text shaping is the host's business; the dock only needs widths to lay out tabs.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed advance per character. Deterministic, useful headless and in tests.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    pub char_width: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { char_width: 7.0 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Measures with the fonts of an `egui` painter.
pub struct EguiTextMeasure<'a> {
    pub painter: &'a Painter,
    pub font_id: FontId,
}

impl TextMeasure for EguiTextMeasure<'_> {
    fn text_width(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), self.font_id.clone(), Color32::WHITE)
            .size()
            .x
    }
}

/// One primitive of the per-frame output, consumed in order by the rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        color: Color32,
    },
    Text {
        pos: Pos2,
        align: Align2,
        text: String,
        color: Color32,
    },

    /// Clip every following command to `rect` until the next scissor command.
    Scissor(Rect),
    ResetScissor,

    /// The host draws the controls of `panel` inside `rect` here.
    PanelContent {
        panel: PanelId,
        rect: Rect,
    },
}

/// Ordered draw output of one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn rect(&mut self, rect: Rect, color: Color32) {
        if rect.width() > 0.0 && rect.height() > 0.0 {
            self.commands.push(DrawCommand::Rect { rect, color });
        }
    }

    pub fn text(&mut self, pos: Pos2, align: Align2, text: impl Into<String>, color: Color32) {
        self.commands.push(DrawCommand::Text {
            pos,
            align,
            text: text.into(),
            color,
        });
    }

    pub fn scissor(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Scissor(rect));
    }

    pub fn reset_scissor(&mut self) {
        self.commands.push(DrawCommand::ResetScissor);
    }

    pub fn panel_content(&mut self, panel: PanelId, rect: Rect) {
        self.commands.push(DrawCommand::PanelContent { panel, rect });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Filled rects drawn with exactly `color`, in submission order.
    pub fn rects_with_color(&self, color: Color32) -> impl Iterator<Item = Rect> + '_ {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::Rect { rect, color: c } if *c == color => Some(*rect),
            _ => None,
        })
    }

    /// Panels whose content was requested this frame.
    pub fn panel_contents(&self) -> impl Iterator<Item = (PanelId, Rect)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::PanelContent { panel, rect } => Some((*panel, *rect)),
            _ => None,
        })
    }
}

/// Replay a [`DrawList`] onto an `egui` painter.
///
/// `panel_ui` is called for every [`DrawCommand::PanelContent`] with a painter clipped to the
/// current scissor.
pub fn paint_with_egui(
    painter: &Painter,
    list: &DrawList,
    font_id: &FontId,
    mut panel_ui: impl FnMut(&Painter, PanelId, Rect),
) {
    let mut current = painter.clone();
    for cmd in list.commands() {
        match cmd {
            DrawCommand::Rect { rect, color } => {
                current.rect_filled(*rect, 0.0, *color);
            }
            DrawCommand::Text {
                pos,
                align,
                text,
                color,
            } => {
                current.text(*pos, *align, text, font_id.clone(), *color);
            }
            DrawCommand::Scissor(rect) => {
                current = painter.with_clip_rect(*rect);
            }
            DrawCommand::ResetScissor => {
                current = painter.clone();
            }
            DrawCommand::PanelContent { panel, rect } => {
                panel_ui(&current, *panel, *rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn degenerate_rects_are_skipped() {
        let mut list = DrawList::default();
        list.rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 10.0)), Color32::RED);
        list.rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0)), Color32::RED);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn monospace_counts_chars_not_bytes() {
        let m = MonospaceMeasure { char_width: 10.0 };
        assert_eq!(m.text_width("abc"), 30.0);
        assert_eq!(m.text_width("été"), 30.0);
    }
}
