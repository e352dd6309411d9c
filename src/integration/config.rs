//! Configuration for the assistant
//!
//! Loaded from TOML; every field has a default so a missing or partial
//! file still yields a usable configuration.

use crate::services::WikipediaConfig;
use crate::speech::{TTSConfig, WhisperConfig};
use crate::{MedibotError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "MEDIBOT_CONFIG";

/// Settings for the services actions call into
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub wikipedia: WikipediaConfig,

    /// Sentences per encyclopedia summary
    pub summary_sentences: usize,

    /// Replaces the platform hibernate command when non-empty
    pub hibernate_command: Vec<String>,

    /// Replaces the built-in jokes when non-empty
    pub jokes: Vec<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            wikipedia: WikipediaConfig::default(),
            summary_sentences: 2,
            hibernate_command: Vec::new(),
            jokes: Vec::new(),
        }
    }
}

/// Configuration for the complete assistant
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MedibotConfig {
    /// STT (Whisper) configuration
    pub stt: WhisperConfig,

    /// TTS configuration
    pub tts: TTSConfig,

    pub services: ServicesConfig,

    /// Listen on the microphone; otherwise commands are typed
    pub enable_audio_input: bool,

    /// Speak responses aloud
    pub enable_audio_output: bool,
}

impl Default for MedibotConfig {
    fn default() -> Self {
        Self {
            stt: WhisperConfig::default(),
            tts: TTSConfig::default(),
            services: ServicesConfig::default(),
            enable_audio_input: cfg!(feature = "audio-io"),
            enable_audio_output: cfg!(feature = "audio-io"),
        }
    }
}

impl MedibotConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MedibotError::ConfigError(format!("Invalid config: {}", e)))
    }

    /// Read a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MedibotError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml(&text)
    }

    /// Where the config file is looked up when none is given
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medibot").join("config.toml"))
    }

    /// Load from `$MEDIBOT_CONFIG`, then the user config dir, else defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Disable audio input (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Disable audio output (transcript only)
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Check that the enabled speech models exist
    pub fn validate(&self) -> Result<()> {
        if self.enable_audio_input && !cfg!(feature = "audio-io") {
            return Err(MedibotError::ConfigError(
                "Audio input needs the audio-io feature".to_string(),
            ));
        }

        if self.enable_audio_input && !self.stt.model_path.exists() {
            return Err(MedibotError::ModelLoadError(format!(
                "Whisper model not found: {:?}",
                self.stt.model_path
            )));
        }

        if self.enable_audio_output {
            self.tts.validate()?;
        }

        if self.services.summary_sentences == 0 {
            return Err(MedibotError::ConfigError(
                "summary_sentences must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
