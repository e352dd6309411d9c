//! Scrolling conversation transcript

use crate::messages::{Message, Sender};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Stroke};

/// Read-only view of the transcript, scrolled to the newest line
pub struct TranscriptView<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> TranscriptView<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .stroke(Stroke::new(1.0, self.theme.border))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("transcript")
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in self.state.transcript.messages() {
                            self.show_message(ui, message);
                            ui.add_space(self.theme.spacing_sm);
                        }
                    });
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let text = message.to_string();
        let color = match message.sender {
            Sender::System => self.theme.error,
            _ => self.theme.text_primary,
        };

        let response = ui.add(egui::Label::new(RichText::new(&text).color(color)).wrap());
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &text));
    }
}
