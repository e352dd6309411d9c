pub mod assistant;
pub mod audio;
pub mod integration;
pub mod messages;
pub mod services;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MedibotError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("TTS error: {0}")]
    TTSError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Lookup error: {0}")]
    LookupError(String),

    #[error("Launch error: {0}")]
    LaunchError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<std::io::Error> for MedibotError {
    fn from(e: std::io::Error) -> Self {
        MedibotError::IOError(e.to_string())
    }
}

impl MedibotError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            MedibotError::AudioDeviceError(_) => false,
            // Model errors require fixing the config and restarting the session
            MedibotError::ModelLoadError(_) => false,
            MedibotError::TranscriptionError(_) => true,
            MedibotError::TTSError(_) => true,
            MedibotError::IOError(_) => false,
            MedibotError::AudioProcessingError(_) => true,
            MedibotError::ConfigError(_) => false,
            MedibotError::ChannelError(_) => false,
            MedibotError::LookupError(_) => true,
            MedibotError::LaunchError(_) => true,
            MedibotError::SessionError(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            MedibotError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            MedibotError::ModelLoadError(_) => {
                "Failed to load a speech model. Please verify model files are present.".to_string()
            }
            MedibotError::TranscriptionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            MedibotError::TTSError(_) => {
                "Text-to-speech failed. Responses will be shown as text.".to_string()
            }
            MedibotError::IOError(_) => "File system error occurred.".to_string(),
            MedibotError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            MedibotError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            MedibotError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            MedibotError::LookupError(_) => "The lookup service did not answer.".to_string(),
            MedibotError::LaunchError(_) => "Couldn't run a system command.".to_string(),
            MedibotError::SessionError(_) => "The assistant is already running.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MedibotError>;
