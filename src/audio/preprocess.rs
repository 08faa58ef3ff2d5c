//! Capture conditioning before upload
//!
//! The transcription endpoint gets the recording as 16 kHz mono with the
//! DC offset removed and the peak normalized.

use crate::audio::resample::resample_to;
use crate::config::UPLOAD_SAMPLE_RATE;
use crate::Result;
use tracing::debug;

/// Remove the mean from the signal
pub fn remove_dc_offset(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mean: f32 = samples.iter().sum::<f32>() / samples.len() as f32;
    samples.iter().map(|&s| s - mean).collect()
}

/// Scale the signal to a 0.95 peak
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let peak = samples.iter().map(|&s| s.abs()).fold(0.0f32, f32::max);
    if peak == 0.0 || peak.is_nan() {
        return samples.to_vec();
    }

    let gain = 0.95 / peak;
    samples.iter().map(|&s| s * gain).collect()
}

/// Condition a mono recording for the transcription upload
pub fn prepare_for_transcription(input: &[f32], input_sample_rate: u32) -> Result<Vec<f32>> {
    debug!(
        "Preparing {} samples at {} Hz for transcription",
        input.len(),
        input_sample_rate
    );

    let centered = remove_dc_offset(input);
    let resampled = resample_to(&centered, input_sample_rate, UPLOAD_SAMPLE_RATE)?;
    Ok(normalize_peak(&resampled))
}
