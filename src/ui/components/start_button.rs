//! Button bound to the session trigger

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

pub const START_LABEL: &str = "Start Assistant";
pub const RUNNING_LABEL: &str = "Assistant is Running";

/// Starts a session; disabled while one is running
pub struct StartButton<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> StartButton<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let running = self.state.is_running();
        let label = if running { RUNNING_LABEL } else { START_LABEL };

        let button = egui::Button::new(RichText::new(label).strong().color(Color32::WHITE))
            .min_size(Vec2::new(200.0, 40.0))
            .rounding(self.theme.button_rounding)
            .fill(if running {
                self.theme.text_muted
            } else {
                self.theme.primary
            });

        let response = ui.add_enabled(!running, button);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, !running, label));

        if response.clicked() {
            self.state.start_session();
        }
    }
}
