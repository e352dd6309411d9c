//! Theme and styling for the Medibot window

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Start button fill
    pub primary: Color32,
    /// Start button fill while hovered
    pub primary_hover: Color32,
    /// Error lines in the transcript
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,

    /// Heading color
    pub title: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_muted: Color32,

    /// Transcript border
    pub border: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// The light theme the assistant ships with
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(0x34, 0x98, 0xdb),       // Blue
            primary_hover: Color32::from_rgb(0x29, 0x80, 0xb9), // Darker blue
            error: Color32::from_rgb(192, 57, 43),              // Red

            bg_primary: Color32::from_rgb(242, 242, 242),
            bg_secondary: Color32::WHITE,

            title: Color32::from_rgb(0x2c, 0x3e, 0x50), // Midnight blue

            text_primary: Color32::from_rgb(0x33, 0x33, 0x33),
            text_muted: Color32::from_rgb(127, 140, 141),

            border: Color32::from_rgb(0xd0, 0xd0, 0xd0),

            button_rounding: Rounding::same(6.0),
            card_rounding: Rounding::same(4.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_secondary;

        // Widget text stays dark: text edits draw it on `extreme_bg_color`.
        // Buttons on the blue fill set white text per widget.
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.inactive.weak_bg_fill = self.primary;
        visuals.widgets.inactive.bg_fill = self.primary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.weak_bg_fill = self.primary_hover;
        visuals.widgets.hovered.bg_fill = self.primary_hover;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.weak_bg_fill = self.primary_hover;
        visuals.widgets.active.bg_fill = self.primary_hover;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
