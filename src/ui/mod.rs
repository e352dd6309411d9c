//! GUI implementation with egui/eframe

mod app;
pub mod components;
mod state;
mod theme;

pub use app::{MedibotApp, WINDOW_TITLE};
pub use components::start_button::{RUNNING_LABEL, START_LABEL};
pub use state::{AppState, WELCOME_TEXT};
pub use theme::Theme;

use crate::integration::MedibotConfig;

/// Open the assistant window and block until it is closed
pub fn run(config: MedibotConfig) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(MedibotApp::new(cc, config)))),
    )
}
