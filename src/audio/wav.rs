use crate::{ParleyError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// Write mono or interleaved f32 samples as 16-bit PCM WAV
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| ParleyError::Io(format!("Failed to create WAV writer: {}", e)))?;

    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| ParleyError::Io(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| ParleyError::Io(format!("Failed to finalize WAV file: {}", e)))?;

    debug!("Wrote {} samples to {:?}", samples.len(), path.as_ref());
    Ok(())
}

/// Read a WAV file back into f32 samples
///
/// Returns (samples, sample_rate, channels). Supports the formats this
/// application produces or receives: 16-bit integer and 32-bit float PCM.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32, u16)> {
    let mut reader = WavReader::open(path.as_ref())
        .map_err(|e| ParleyError::Io(format!("Failed to open WAV file: {}", e)))?;

    let spec = reader.spec();

    let samples: Result<Vec<f32>> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map_err(|e| ParleyError::Io(format!("Failed to read sample: {}", e))))
            .collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| {
                s.map(|v| v as f32 / i16::MAX as f32)
                    .map_err(|e| ParleyError::Io(format!("Failed to read sample: {}", e)))
            })
            .collect(),
        (format, bits) => Err(ParleyError::AudioProcessing(format!(
            "Unsupported WAV format: {:?} at {} bits",
            format, bits
        ))),
    };

    Ok((samples?, spec.sample_rate, spec.channels))
}
