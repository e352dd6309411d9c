//! Text-to-speech with sherpa-rs (VITS models)
//!
//! Speech is rendered on a worker fed by a FIFO channel: callers never
//! block on synthesis or playback, and responses are spoken in the order
//! they were queued.

use crate::{MedibotError, Result};
use crossbeam_channel::{unbounded, Sender};
use serde::Deserialize;
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::path::Path;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Configuration for the TTS engine
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TTSConfig {
    /// Path to the ONNX model file
    pub model_path: String,

    /// Path to the tokens file
    pub tokens_path: String,

    /// Path to the lexicon file (optional for some models)
    pub lexicon_path: Option<String>,

    /// Path to the espeak-ng data directory (optional)
    pub data_dir: Option<String>,

    /// Length scale for speech rate (1.0 = normal, >1.0 = slower)
    pub length_scale: f32,

    pub noise_scale: f32,

    pub noise_scale_w: f32,

    /// Speaker ID for multi-speaker models
    pub speaker_id: i32,

    /// Playback speed multiplier passed to the synthesizer
    pub speed: f32,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            model_path: "models/tts/en_US-amy-low.onnx".to_string(),
            tokens_path: "models/tts/tokens.txt".to_string(),
            lexicon_path: None,
            data_dir: Some("models/tts/espeak-ng-data".to_string()),
            length_scale: 1.0,
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            speaker_id: 0,
            // A calm pace for spoken answers
            speed: 0.85,
        }
    }
}

impl TTSConfig {
    pub fn new(model_path: impl Into<String>, tokens_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_path.is_empty() {
            return Err(MedibotError::ConfigError("TTS model path is required".into()));
        }
        if !Path::new(&self.model_path).exists() {
            return Err(MedibotError::ModelLoadError(format!(
                "TTS model not found: {}",
                self.model_path
            )));
        }
        if !Path::new(&self.tokens_path).exists() {
            return Err(MedibotError::ModelLoadError(format!(
                "TTS tokens file not found: {}",
                self.tokens_path
            )));
        }
        Ok(())
    }
}

/// Something that can say a line out loud, blocking until it is done
pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// VITS synthesis wrapped around sherpa-rs
pub struct TTSEngine {
    tts: VitsTts,
    config: TTSConfig,
}

impl TTSEngine {
    pub fn new(config: TTSConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading VITS TTS model from: {}", config.model_path);

        let vits_config = VitsTtsConfig {
            model: config.model_path.clone(),
            tokens: config.tokens_path.clone(),
            lexicon: config.lexicon_path.clone().unwrap_or_default(),
            data_dir: config.data_dir.clone().unwrap_or_default(),
            length_scale: config.length_scale,
            noise_scale: config.noise_scale,
            noise_scale_w: config.noise_scale_w,
            ..Default::default()
        };

        let tts = VitsTts::new(vits_config);

        info!("TTS engine initialized successfully");
        Ok(Self { tts, config })
    }

    /// Synthesize text into mono samples and their sample rate
    pub fn synthesize(&mut self, text: &str) -> Result<(Vec<f32>, u32)> {
        let normalized = normalize_for_speech(text);
        if normalized.is_empty() {
            return Ok((Vec::new(), 0));
        }

        debug!("Synthesizing: {}", normalized);

        let audio = self
            .tts
            .create(&normalized, self.config.speaker_id, self.config.speed)
            .map_err(|e| MedibotError::TTSError(format!("Synthesis failed: {}", e)))?;

        Ok((audio.samples, audio.sample_rate as u32))
    }
}

/// Synthesizes with [`TTSEngine`] and plays through the default output
#[cfg(feature = "audio-io")]
pub struct VitsSpeaker {
    engine: TTSEngine,
    output: crate::audio::AudioOutput,
}

#[cfg(feature = "audio-io")]
impl VitsSpeaker {
    pub fn new(config: TTSConfig) -> Result<Self> {
        Ok(Self {
            engine: TTSEngine::new(config)?,
            output: crate::audio::AudioOutput::new()?,
        })
    }
}

#[cfg(feature = "audio-io")]
impl SpeechSynthesizer for VitsSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        let (samples, sample_rate) = self.engine.synthesize(text)?;
        self.output.play(samples, sample_rate)
    }
}

/// Sending half of a speech worker's queue
#[derive(Clone, Debug)]
pub struct SpeechHandle {
    tx: Sender<String>,
}

impl SpeechHandle {
    /// Queue a line; returns immediately
    pub fn speak(&self, text: &str) {
        if self.tx.send(text.to_string()).is_err() {
            warn!("Speech worker is gone, dropping line");
        }
    }
}

/// Start a speech worker
///
/// `build` runs on the worker thread. Failures to build or to speak are
/// passed to `on_error` and never stop the worker; it exits once every
/// handle is dropped and the queue is drained.
pub fn spawn_speech_worker<B, E>(build: B, on_error: E) -> Result<(SpeechHandle, JoinHandle<()>)>
where
    B: FnOnce() -> Result<Box<dyn SpeechSynthesizer>> + Send + 'static,
    E: Fn(&MedibotError) + Send + 'static,
{
    let (tx, rx) = unbounded::<String>();

    let handle = thread::Builder::new()
        .name("medibot-speech".to_string())
        .spawn(move || {
            let mut synthesizer = match build() {
                Ok(synthesizer) => Some(synthesizer),
                Err(e) => {
                    warn!("Speech is unavailable: {}", e);
                    on_error(&e);
                    None
                }
            };

            while let Ok(text) = rx.recv() {
                let Some(synthesizer) = synthesizer.as_mut() else {
                    continue;
                };
                if let Err(e) = synthesizer.speak(&text) {
                    warn!("Speaking failed: {}", e);
                    on_error(&e);
                }
            }

            debug!("Speech worker stopped");
        })
        .map_err(|e| MedibotError::TTSError(format!("Failed to spawn speech worker: {}", e)))?;

    Ok((SpeechHandle { tx }, handle))
}

/// Clean text up so the synthesizer reads it naturally
///
/// Parenthesized asides (pronunciations, dates in encyclopedia intros) are
/// dropped, a few symbols are spelled out and whitespace is collapsed.
pub fn normalize_for_speech(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }

    let symbols = [
        ("&", " and "),
        ("%", " percent"),
        ("+", " plus "),
        ("=", " equals "),
        ("e.g.", "for example"),
        ("i.e.", "that is"),
    ];
    for (symbol, spoken) in symbols {
        result = result.replace(symbol, spoken);
    }

    let result = result.split_whitespace().collect::<Vec<_>>().join(" ");
    // Removing an aside leaves "word ," behind
    result
        .replace(" ,", ",")
        .replace(" .", ".")
        .trim()
        .to_string()
}
