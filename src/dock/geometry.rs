use egui::{Rect, pos2, vec2};

use crate::style::DockStyle;

/// How a split's stored `amount` maps to a pixel offset along its span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Magnet {
    /// `amount` is the size of the first (left/top) child in points.
    Start,

    /// `amount` is the first child's fraction of the span, `0.0..=1.0`.
    Middle,

    /// `amount` is the size of the second (right/bottom) child in points.
    End,
}

impl Magnet {
    pub const LEFT: Self = Self::Start;
    pub const TOP: Self = Self::Start;
    pub const RIGHT: Self = Self::End;
    pub const BOTTOM: Self = Self::End;

    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::Middle => Self::Middle,
            Self::End => Self::Start,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// Children side by side (`HSplit`).
    Horizontal,

    /// Children stacked (`VSplit`).
    Vertical,
}

impl SplitAxis {
    pub(crate) fn span(self, rect: Rect) -> f32 {
        match self {
            Self::Horizontal => rect.width(),
            Self::Vertical => rect.height(),
        }
    }

    pub(crate) fn min_size(self, style: &DockStyle) -> f32 {
        match self {
            Self::Horizontal => style.min_h_size,
            Self::Vertical => style.min_v_size,
        }
    }
}

/// Offset of the split line from the start of the span.
pub fn split_pos(amount: f32, magnet: Magnet, span: f32) -> f32 {
    match magnet {
        Magnet::Start => amount.floor(),
        Magnet::End => (span - amount).floor(),
        Magnet::Middle => (span * amount).floor(),
    }
}

/// Inverse of [`split_pos`]: the `amount` that puts the split line at `pos`.
pub fn amount_from_split_pos(pos: f32, magnet: Magnet, span: f32) -> f32 {
    match magnet {
        Magnet::Start => pos,
        Magnet::End => span - pos,
        Magnet::Middle => {
            if span > 0.0 {
                pos / span
            } else {
                0.5
            }
        }
    }
}

/// Keep both children of a dragged split at least `min_size` large.
///
/// A span too small for two minimum children pins the line to the middle.
pub(crate) fn clamp_split_pos(pos: f32, span: f32, min_size: f32) -> f32 {
    let min_size = min_size.min(span * 0.5).max(0.0);
    pos.max(min_size).min((span - min_size).max(min_size))
}

/// Child rects of a split whose line sits at `pos`, each losing half of `margin`.
pub(crate) fn split_rects(rect: Rect, axis: SplitAxis, pos: f32, margin: f32) -> (Rect, Rect) {
    let half = margin * 0.5;
    match axis {
        SplitAxis::Horizontal => {
            let first_max = (rect.min.x + pos - half).clamp(rect.min.x, rect.max.x);
            let second_min = (rect.min.x + pos + half).clamp(rect.min.x, rect.max.x);
            (
                Rect::from_min_max(rect.min, pos2(first_max, rect.max.y)),
                Rect::from_min_max(pos2(second_min, rect.min.y), rect.max),
            )
        }
        SplitAxis::Vertical => {
            let first_max = (rect.min.y + pos - half).clamp(rect.min.y, rect.max.y);
            let second_min = (rect.min.y + pos + half).clamp(rect.min.y, rect.max.y);
            (
                Rect::from_min_max(rect.min, pos2(rect.max.x, first_max)),
                Rect::from_min_max(pos2(rect.min.x, second_min), rect.max),
            )
        }
    }
}

/// A bar of `thickness` centred on the split line.
pub(crate) fn split_bar(rect: Rect, axis: SplitAxis, pos: f32, thickness: f32) -> Rect {
    let half = thickness * 0.5;
    match axis {
        SplitAxis::Horizontal => Rect::from_min_size(
            pos2(rect.min.x + pos - half, rect.min.y),
            vec2(thickness, rect.height()),
        ),
        SplitAxis::Vertical => Rect::from_min_size(
            pos2(rect.min.x, rect.min.y + pos - half),
            vec2(rect.width(), thickness),
        ),
    }
}

/// Split a zone rect into its tab strip and content rect.
pub(crate) fn tab_strip_and_content(rect: Rect, control_height: f32) -> (Rect, Rect) {
    let strip_h = control_height.min(rect.height()).max(0.0);
    let strip = Rect::from_min_size(rect.min, vec2(rect.width(), strip_h));
    let content = Rect::from_min_max(pos2(rect.min.x, rect.min.y + strip_h), rect.max);
    (strip, content)
}

/// Lay out tabs left to right inside `strip`.
///
/// A tab is laid out while its start offset is still inside the strip, and is clipped to the
/// strip. Tabs past the end get `None`.
pub(crate) fn layout_tabs(
    strip: Rect,
    widths: impl IntoIterator<Item = f32>,
    spacing: f32,
) -> Vec<Option<Rect>> {
    let mut offset = 0.0;
    widths
        .into_iter()
        .map(|width| {
            if offset >= strip.width() {
                return None;
            }
            let tab = Rect::from_min_size(pos2(strip.min.x + offset, strip.min.y), vec2(width, strip.height()));
            offset += width + spacing;
            Some(tab.intersect(strip))
        })
        .collect()
}

/// Hit rect of the close glyph at the right end of a closable tab.
pub(crate) fn close_glyph_rect(tab: Rect, style: &DockStyle) -> Rect {
    let size = style.close_button_size;
    Rect::from_center_size(
        pos2(tab.max.x - style.tab_padding - size * 0.5, tab.center().y),
        vec2(size, size),
    )
}
