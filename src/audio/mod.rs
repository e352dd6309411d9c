//! Audio capture, playback and the signal processing between the
//! microphone and the recognizer.

#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod resampler;
pub mod vad;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use resampler::StreamResampler;
pub use vad::{EndpointConfig, EndpointEvent, Endpointer, VoiceActivityDetector};

/// Sample rate the recognizer and VAD expect
pub const SPEECH_SAMPLE_RATE: u32 = 16000;

/// Average interleaved frames down to mono
pub fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
