use super::downmix;
use crate::{MedibotError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Microphone stream delivering mono f32 chunks at the device rate
///
/// Opened for a single listen and dropped afterwards; the cpal stream
/// stays on the thread that created it.
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioInput {
    /// Create a new audio input with the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| MedibotError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                MedibotError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Get the sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start streaming mono samples into the channel
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Err(e) = audio_tx.try_send(downmix(data, channels)) {
                        debug!("Dropped audio chunk: {}", e);
                    }
                },
                |err| error!("Audio input stream error: {}", err),
                None,
            )
            .map_err(|e| {
                MedibotError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            MedibotError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);
        debug!("Microphone stream started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            debug!("Microphone stream stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioInput {
    fn drop(&mut self) {
        self.stop();
    }
}
