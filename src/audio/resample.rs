use crate::{ParleyError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Mono sample-rate converter.
///
/// Everything in this application is mono by the time it needs
/// resampling (capture is down-mixed in the input callback, synthesis
/// is down-mixed during decode), so only single-channel conversion is
/// supported.
pub struct AudioResampler {
    inner: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

const CHUNK_FRAMES: usize = 1024;

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ParleyError::Config(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let inner = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1).map_err(|e| {
            ParleyError::AudioProcessing(format!("Failed to create resampler: {}", e))
        })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            inner,
            input_rate,
            output_rate,
        })
    }

    /// Resample a complete buffer in one call.
    ///
    /// `SincFixedIn` wants fixed-size chunks, so the tail chunk is
    /// zero-padded and the corresponding surplus output trimmed.
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

        let chunk_size = self.inner.input_frames_max();
        for chunk in input.chunks(chunk_size) {
            let mut frame = vec![0.0f32; chunk_size];
            frame[..chunk.len()].copy_from_slice(chunk);

            let processed = self
                .inner
                .process(&[frame], None)
                .map_err(|e| ParleyError::AudioProcessing(format!("Resampling failed: {}", e)))?;

            let produced = &processed[0];
            let wanted = if chunk.len() < chunk_size {
                ((chunk.len() as f64 * ratio).ceil() as usize).min(produced.len())
            } else {
                produced.len()
            };
            output.extend_from_slice(&produced[..wanted]);
        }

        debug!("Resampled {} frames -> {} frames", input.len(), output.len());
        Ok(output)
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }
}

/// One-shot mono resampling helper
pub fn resample_to(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }
    AudioResampler::new(input_rate, output_rate)?.resample(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_creation() {
        assert!(AudioResampler::new(48000, 16000).is_ok());
        assert!(AudioResampler::new(0, 16000).is_err());
        assert!(AudioResampler::new(48000, 0).is_err());
    }

    #[test]
    fn test_downsampling_shrinks() {
        let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_to(&input, 48000, 16000).unwrap();
        assert!(!output.is_empty());
        assert!(output.len() < input.len());
        // Roughly a third of the input length
        let expected = input.len() / 3;
        assert!(output.len().abs_diff(expected) < expected / 4);
    }

    #[test]
    fn test_upsampling_grows() {
        let input: Vec<f32> = (0..1600).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_to(&input, 16000, 48000).unwrap();
        assert!(output.len() > input.len() * 2);
    }

    #[test]
    fn test_same_rate_is_identity() {
        let input = vec![0.1f32, 0.2, 0.3];
        let output = resample_to(&input, 16000, 16000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let mut resampler = AudioResampler::new(16000, 48000).unwrap();
        assert!(resampler.resample(&[]).unwrap().is_empty());
    }
}
