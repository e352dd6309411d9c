use crate::{MedibotError, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info};

/// Blocking playback on the default output device
pub struct AudioOutput {
    // Dropping the stream silences every sink created from its handle
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            MedibotError::AudioDeviceError(format!("Failed to open output device: {}", e))
        })?;

        info!("Audio output ready");

        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Play mono samples and return once they have finished
    pub fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let sink = Sink::try_new(&self.handle).map_err(|e| {
            MedibotError::AudioDeviceError(format!("Failed to create sink: {}", e))
        })?;

        debug!(
            "Playing {:.2}s of audio",
            samples.len() as f32 / sample_rate as f32
        );

        sink.append(SamplesBuffer::new(1, sample_rate, samples));
        sink.sleep_until_end();
        Ok(())
    }
}
