use egui::Color32;

/// Metrics and colours used by the dock layout, hit-testing and drawing.
///
/// The defaults reproduce the stock dark theme. Every field can be tweaked by the host;
/// call [`crate::Context::set_style`] (or re-run [`crate::PanelsManager::update_layout`])
/// afterwards so the geometry is recomputed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockStyle {
    /// Gap between the two children of a split. Also the size of the split handle.
    pub panel_margin: f32,

    /// Inset between a zone's content rect and the active panel's content.
    pub panel_padding: f32,

    /// Height of the tab strip at the top of every zone.
    pub control_height: f32,

    /// Horizontal gap between two tabs.
    pub tab_spacing: f32,

    /// Horizontal padding on each side of a tab title.
    pub tab_padding: f32,

    /// Width reserved for the close glyph of closable tabs.
    pub close_button_size: f32,

    /// Smallest width a split child can be dragged to.
    pub min_h_size: f32,

    /// Smallest height a split child can be dragged to.
    pub min_v_size: f32,

    /// Cap for the size of a new side panel docked on a left/right edge.
    pub default_side_width: f32,

    /// Cap for the size of a new side panel docked on a top/bottom edge.
    pub default_side_height: f32,

    /// Pointer travel (in points) before a pressed tab turns into a panel drag.
    pub drag_threshold: f32,

    pub window_color: Color32,
    pub panel_color: Color32,
    pub active_color: Color32,
    pub inactive_tab_color: Color32,
    pub separator_color: Color32,
    pub text_color: Color32,
    pub disabled_text_color: Color32,

    /// Fill for drop previews and split-drag previews.
    pub dock_color: Color32,
}

impl Default for DockStyle {
    fn default() -> Self {
        let active_color = Color32::from_rgb(0x69, 0x9c, 0xe8);
        Self {
            panel_margin: 8.0,
            panel_padding: 5.0,
            control_height: 26.0,
            tab_spacing: 0.0,
            tab_padding: 8.0,
            close_button_size: 16.0,
            min_h_size: 200.0,
            min_v_size: 100.0,
            default_side_width: 300.0,
            default_side_height: 200.0,
            drag_threshold: 4.0,

            window_color: Color32::from_rgb(0x20, 0x25, 0x31),
            panel_color: Color32::from_rgb(0x33, 0x3b, 0x4f),
            active_color,
            inactive_tab_color: Color32::from_rgb(0x26, 0x2c, 0x3b),
            separator_color: Color32::from_rgb(0x19, 0x1d, 0x27),
            text_color: Color32::from_rgb(0xe0, 0xe0, 0xe0),
            disabled_text_color: Color32::from_rgb(0x77, 0x7a, 0x82),
            dock_color: Color32::from_rgba_unmultiplied(
                active_color.r() / 2,
                active_color.g() / 2,
                active_color.b() / 2,
                0x80,
            ),
        }
    }
}

impl DockStyle {
    /// Width of a tab whose title measures `text_width`.
    pub(crate) fn tab_width(&self, text_width: f32, closable: bool) -> f32 {
        let close = if closable {
            self.close_button_size + self.tab_padding
        } else {
            0.0
        };
        text_width + self.tab_padding * 2.0 + close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closable_tabs_reserve_room_for_the_glyph() {
        let style = DockStyle::default();
        assert_eq!(style.tab_width(40.0, false), 56.0);
        assert_eq!(style.tab_width(40.0, true), 80.0);
    }

    #[test]
    fn dock_color_is_a_dimmed_active_color() {
        let style = DockStyle::default();
        assert_eq!(style.dock_color.a(), 0x80);
        assert!(style.dock_color.b() < style.active_color.b());
    }
}
