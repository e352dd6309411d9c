//! Main application struct and eframe integration

use crate::integration::MedibotConfig;
use crate::ui::components::{InputBar, StartButton, TranscriptView};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Medibot Health Assistant";

/// How often the transcript is refreshed while a session runs
const RUNNING_REFRESH: Duration = Duration::from_millis(100);
const IDLE_REFRESH: Duration = Duration::from_millis(500);

/// Main Medibot application
pub struct MedibotApp {
    state: AppState,
    theme: Theme,
}

impl MedibotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: MedibotConfig) -> Self {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        Self {
            state: AppState::new(config),
            theme,
        }
    }

    /// Wrap existing state, leaving egui's styling alone
    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            theme: Theme::light(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Drain pending messages and lay out one frame
    pub fn show(&mut self, ctx: &egui::Context) {
        self.state.poll_events();

        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(WINDOW_TITLE)
                            .size(24.0)
                            .strong()
                            .color(self.theme.title),
                    );
                });
            });

        TopBottomPanel::bottom("controls")
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                if self.state.is_text_only() {
                    InputBar::new(&mut self.state, &self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                }
                ui.vertical_centered(|ui| {
                    StartButton::new(&mut self.state, &self.theme).show(ui);
                });
            });

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                TranscriptView::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for MedibotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);

        // Session workers post from other threads, so keep polling
        let refresh = if self.state.is_running() {
            RUNNING_REFRESH
        } else {
            IDLE_REFRESH
        };
        ctx.request_repaint_after(refresh);
    }
}
