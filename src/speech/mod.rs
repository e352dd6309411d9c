//! Speech processing
//!
//! - Speech-to-text using Whisper (or typed input in text-only mode)
//! - Text-to-speech using sherpa-rs VITS models

pub mod stt;
pub mod tts;

#[cfg(feature = "audio-io")]
pub use stt::MicrophoneListener;
pub use stt::{clean_transcript, TypedListener, WhisperConfig, WhisperEngine};
#[cfg(feature = "audio-io")]
pub use tts::VitsSpeaker;
pub use tts::{
    normalize_for_speech, spawn_speech_worker, SpeechHandle, SpeechSynthesizer, TTSConfig,
    TTSEngine,
};
