use crate::{MedibotError, Result};
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::info;
use voice_activity_detector::VoiceActivityDetector as VadDetector;

/// Voice Activity Detection using Silero VAD
pub struct VoiceActivityDetector {
    detector: VadDetector,
    sample_rate: u32,
    threshold: f32,
}

impl VoiceActivityDetector {
    /// Create a new VAD instance
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate of the audio (8000 or 16000)
    /// * `threshold` - Probability threshold for speech detection (0.0-1.0)
    pub fn new(sample_rate: u32, threshold: f32) -> Result<Self> {
        if ![8000, 16000].contains(&sample_rate) {
            return Err(MedibotError::ConfigError(format!(
                "Invalid sample rate: {}. Must be 8000 or 16000",
                sample_rate
            )));
        }

        let detector = VadDetector::builder()
            .sample_rate(sample_rate as i32)
            .chunk_size(chunk_size_for(sample_rate))
            .build()
            .map_err(|e| {
                MedibotError::AudioProcessingError(format!("Failed to create VAD: {:?}", e))
            })?;

        info!(
            "Initialized VAD with sample rate: {}, threshold: {}",
            sample_rate, threshold
        );

        Ok(Self {
            detector,
            sample_rate,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// Whether the chunk contains speech
    pub fn is_speech(&mut self, audio: &[f32]) -> bool {
        self.detector.predict(audio.iter().copied()) >= self.threshold
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }

    /// Samples per prediction (32ms)
    pub fn chunk_size(&self) -> usize {
        chunk_size_for(self.sample_rate)
    }
}

fn chunk_size_for(sample_rate: u32) -> usize {
    match sample_rate {
        8000 => 256,
        _ => 512,
    }
}

/// Phrase boundaries for one listen
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Audio kept from just before speech starts
    pub pre_roll_secs: f32,

    /// Silence after speech that ends the phrase
    pub pause_secs: f32,

    /// Longest phrase accepted before it is cut off
    pub max_phrase_secs: f32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            pre_roll_secs: 0.3,
            pause_secs: 0.8,
            max_phrase_secs: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointEvent {
    /// No speech yet
    Waiting,
    /// Inside a phrase
    Speaking,
    /// The phrase is over; take it with [`Endpointer::take_phrase`]
    Complete,
}

/// Turns per-frame speech decisions into one phrase
///
/// Waits indefinitely for speech to begin, then collects audio until a
/// long enough pause or the phrase length limit.
pub struct Endpointer {
    config: EndpointConfig,
    sample_rate: u32,
    pre_roll: VecDeque<f32>,
    phrase: Vec<f32>,
    in_speech: bool,
    silence_secs: f32,
    phrase_secs: f32,
}

impl Endpointer {
    pub fn new(config: EndpointConfig, sample_rate: u32) -> Self {
        Self {
            config,
            sample_rate,
            pre_roll: VecDeque::new(),
            phrase: Vec::new(),
            in_speech: false,
            silence_secs: 0.0,
            phrase_secs: 0.0,
        }
    }

    /// Feed one analysed frame
    pub fn push(&mut self, frame: &[f32], is_speech: bool) -> EndpointEvent {
        let frame_secs = frame.len() as f32 / self.sample_rate as f32;

        if !self.in_speech {
            if !is_speech {
                self.pre_roll.extend(frame.iter().copied());
                let max_pre_roll = (self.config.pre_roll_secs * self.sample_rate as f32) as usize;
                while self.pre_roll.len() > max_pre_roll {
                    self.pre_roll.pop_front();
                }
                return EndpointEvent::Waiting;
            }

            self.in_speech = true;
            self.phrase.extend(self.pre_roll.drain(..));
        }

        self.phrase.extend_from_slice(frame);
        self.phrase_secs += frame_secs;

        if is_speech {
            self.silence_secs = 0.0;
        } else {
            self.silence_secs += frame_secs;
        }

        if self.silence_secs >= self.config.pause_secs
            || self.phrase_secs >= self.config.max_phrase_secs
        {
            EndpointEvent::Complete
        } else {
            EndpointEvent::Speaking
        }
    }

    pub fn in_speech(&self) -> bool {
        self.in_speech
    }

    /// Hand over the collected phrase and start over
    pub fn take_phrase(&mut self) -> Vec<f32> {
        self.in_speech = false;
        self.silence_secs = 0.0;
        self.phrase_secs = 0.0;
        self.pre_roll.clear();
        std::mem::take(&mut self.phrase)
    }
}
