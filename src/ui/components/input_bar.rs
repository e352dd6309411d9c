//! Command entry for text-only mode

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Color32, Key, RichText};

/// Text input feeding the typed listener
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let running = self.state.is_running();

        ui.horizontal(|ui| {
            // Leave room for the send button
            let width = ui.available_width() - 80.0;
            let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
                .hint_text("Type a command...")
                .text_color(self.theme.text_primary)
                .desired_width(width)
                .margin(egui::Margin::symmetric(self.theme.spacing_sm, 6.0))
                .id(egui::Id::new("command_input"));

            let response = ui.add_enabled(running, text_edit);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, running, "Command input")
            });

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            let can_send = running && !self.state.input_text.trim().is_empty();
            let send = ui.add_enabled(
                can_send,
                egui::Button::new(RichText::new("Send").color(Color32::WHITE))
                    .rounding(self.theme.button_rounding),
            );
            send.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send command")
            });

            if submitted || send.clicked() {
                self.state.submit_typed();
                response.request_focus();
            }
        });
    }
}
