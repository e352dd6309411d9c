//! Speech-to-text utterance sources
//!
//! [`MicrophoneListener`] records one phrase per capture and transcribes it
//! with Whisper. [`TypedListener`] takes lines typed into the window
//! instead, for machines without a microphone or models.

use crate::assistant::{CaptureFailure, Utterance, UtteranceSource};
use crate::audio::EndpointConfig;
use crate::{MedibotError, Result};
use crossbeam_channel::Receiver;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Configuration for the Whisper speech-to-text engine
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Language to transcribe (None for auto-detection)
    pub language: Option<String>,

    /// Number of threads to use for transcription
    pub n_threads: i32,

    /// Speech probability above which a frame counts as speech
    pub vad_threshold: f32,

    /// Phrase boundary detection
    pub endpoint: EndpointConfig,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
            vad_threshold: 0.5,
            endpoint: EndpointConfig::default(),
        }
    }
}

/// Whisper speech-to-text engine
pub struct WhisperEngine {
    config: WhisperConfig,
    context: WhisperContext,
}

impl WhisperEngine {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(MedibotError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| MedibotError::ModelLoadError("Invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| {
            MedibotError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e))
        })?;

        info!("Whisper model loaded successfully");

        Ok(Self { config, context })
    }

    /// Transcribe 16 kHz mono samples
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        if samples.is_empty() {
            return Ok(String::new());
        }

        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / crate::audio::SPEECH_SAMPLE_RATE as f32
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        if let Some(ref lang) = self.config.language {
            params.set_language(Some(lang));
        }

        let mut state = self.context.create_state().map_err(|e| {
            MedibotError::TranscriptionError(format!("Failed to create state: {:?}", e))
        })?;

        state.full(params, samples).map_err(|e| {
            MedibotError::TranscriptionError(format!("Transcription failed: {:?}", e))
        })?;

        let num_segments = state.full_n_segments().map_err(|e| {
            MedibotError::TranscriptionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                MedibotError::TranscriptionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        debug!("Transcription result: '{}'", text.trim());
        Ok(text.trim().to_string())
    }
}

/// Reduce a raw transcript to the words that were spoken
///
/// Whisper marks non-speech with bracketed tags such as `[BLANK_AUDIO]` or
/// `(wind blowing)` or `*music*`; those are removed along with punctuation around the
/// ends of the phrase. An empty result means nothing was recognized.
pub fn clean_transcript(text: &str) -> String {
    let mut spoken = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut in_stars = false;
    for c in text.chars() {
        match c {
            '*' => in_stars = !in_stars,
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && !in_stars => spoken.push(c),
            _ => {}
        }
    }

    spoken
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

/// Listens on the default microphone, one phrase per capture
#[cfg(feature = "audio-io")]
pub struct MicrophoneListener {
    engine: WhisperEngine,
    vad: crate::audio::VoiceActivityDetector,
    endpoint: EndpointConfig,
}

#[cfg(feature = "audio-io")]
impl MicrophoneListener {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let vad = crate::audio::VoiceActivityDetector::new(
            crate::audio::SPEECH_SAMPLE_RATE,
            config.vad_threshold,
        )?;
        let endpoint = config.endpoint.clone();
        let engine = WhisperEngine::new(config)?;

        Ok(Self {
            engine,
            vad,
            endpoint,
        })
    }

    /// Record from the microphone until the endpointer closes a phrase
    fn record_phrase(&mut self) -> Result<Vec<f32>> {
        use crate::audio::{AudioInput, EndpointEvent, Endpointer, StreamResampler, SPEECH_SAMPLE_RATE};

        let mut input = AudioInput::new()?;
        let mut resampler = StreamResampler::new(input.sample_rate(), SPEECH_SAMPLE_RATE)?;
        let mut endpointer = Endpointer::new(self.endpoint.clone(), SPEECH_SAMPLE_RATE);
        let frame_len = self.vad.chunk_size();
        self.vad.reset();

        let (audio_tx, audio_rx) = crossbeam_channel::bounded(256);
        input.start(audio_tx)?;

        let mut pending: Vec<f32> = Vec::new();
        loop {
            let raw = audio_rx
                .recv()
                .map_err(|e| MedibotError::ChannelError(format!("Microphone stream ended: {}", e)))?;
            pending.extend(resampler.push(&raw)?);

            while pending.len() >= frame_len {
                let frame: Vec<f32> = pending.drain(..frame_len).collect();
                let is_speech = self.vad.is_speech(&frame);
                if endpointer.push(&frame, is_speech) == EndpointEvent::Complete {
                    input.stop();
                    return Ok(endpointer.take_phrase());
                }
            }
        }
    }
}

#[cfg(feature = "audio-io")]
impl UtteranceSource for MicrophoneListener {
    fn capture(&mut self) -> std::result::Result<Utterance, CaptureFailure> {
        let phrase = self.record_phrase().map_err(|e| {
            warn!("Recording failed: {}", e);
            CaptureFailure::ServiceUnavailable
        })?;

        let text = self.engine.transcribe(&phrase).map_err(|e| {
            warn!("Transcription failed: {}", e);
            CaptureFailure::ServiceUnavailable
        })?;

        let spoken = clean_transcript(&text);
        if spoken.is_empty() {
            debug!("Nothing recognized in {:?}", text);
            return Err(CaptureFailure::Unrecognized);
        }

        Ok(Utterance::new(spoken))
    }
}

/// Takes utterances from lines typed into the window
pub struct TypedListener {
    lines: Receiver<String>,
}

impl TypedListener {
    pub fn new(lines: Receiver<String>) -> Self {
        Self { lines }
    }
}

impl UtteranceSource for TypedListener {
    fn capture(&mut self) -> std::result::Result<Utterance, CaptureFailure> {
        match self.lines.recv() {
            Ok(line) => {
                let spoken = clean_transcript(&line);
                if spoken.is_empty() {
                    Err(CaptureFailure::Unrecognized)
                } else {
                    Ok(Utterance::new(spoken))
                }
            }
            Err(_) => Err(CaptureFailure::ServiceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_transcript_strips_tags_and_edges() {
        assert_eq!(clean_transcript(" Open YouTube."), "Open YouTube");
        assert_eq!(clean_transcript("[BLANK_AUDIO]"), "");
        assert_eq!(clean_transcript("(wind blowing) What time is it?"), "What time is it");
        assert_eq!(clean_transcript("*music* hello"), "hello");
    }

    #[test]
    fn test_clean_transcript_keeps_inner_punctuation() {
        assert_eq!(
            clean_transcript("Hello, what time is it?"),
            "Hello, what time is it"
        );
    }

    #[test]
    fn test_missing_model() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/ggml.bin"),
            ..Default::default()
        };
        assert!(matches!(
            WhisperEngine::new(config),
            Err(MedibotError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_typed_listener() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut listener = TypedListener::new(rx);

        tx.send("  Open Google ".to_string()).unwrap();
        tx.send("...".to_string()).unwrap();
        assert_eq!(listener.capture(), Ok(Utterance::new("open google")));
        assert_eq!(listener.capture(), Err(CaptureFailure::Unrecognized));

        drop(tx);
        assert_eq!(listener.capture(), Err(CaptureFailure::ServiceUnavailable));
    }
}
