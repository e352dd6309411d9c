use crate::{MedibotError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Mono resampler fed with arbitrarily sized pieces of a stream
///
/// Input is buffered until a full resampler chunk is available, so the
/// sinc filter never sees zero padding in the middle of a phrase.
pub struct StreamResampler {
    resampler: Option<SincFixedIn<f32>>,
    pending: Vec<f32>,
}

impl StreamResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(MedibotError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        // Passthrough when the device already runs at the target rate
        let resampler = if input_rate == output_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            let resampler = SincFixedIn::<f32>::new(
                output_rate as f64 / input_rate as f64,
                2.0,
                params,
                1024,
                1,
            )
            .map_err(|e| {
                MedibotError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;
            Some(resampler)
        };

        debug!("Created stream resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            pending: Vec::new(),
        })
    }

    /// Resample whatever full chunks are available
    pub fn push(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(input.to_vec());
        };

        self.pending.extend_from_slice(input);

        let mut output = Vec::new();
        loop {
            let needed = resampler.input_frames_next();
            if self.pending.len() < needed {
                break;
            }

            let chunk: Vec<f32> = self.pending.drain(..needed).collect();
            let processed = resampler.process(&[chunk], None).map_err(|e| {
                MedibotError::AudioProcessingError(format!("Resampling failed: {}", e))
            })?;
            output.extend_from_slice(&processed[0]);
        }

        Ok(output)
    }
}
