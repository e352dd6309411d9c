//! Wiring between configuration, the session and the display

pub mod config;
pub mod launcher;
pub mod renderer;

pub use config::{MedibotConfig, ServicesConfig, CONFIG_ENV};
pub use launcher::SessionLauncher;
pub use renderer::AssistantRenderer;
