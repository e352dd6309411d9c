//! Widgets making up the assistant window

pub mod input_bar;
pub mod start_button;
pub mod transcript_view;

pub use input_bar::InputBar;
pub use start_button::StartButton;
pub use transcript_view::TranscriptView;
