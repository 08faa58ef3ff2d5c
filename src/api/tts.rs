//! Speech synthesis adapter
//!
//! Replies go to the Google Translate TTS endpoint, which returns MP3.
//! The bytes are spooled through a scoped temporary file (removed on
//! drop, success or not) and decoded to mono samples for playback.

use super::Synthesize;
use crate::{ParleyError, Result};
use minimp3::{Decoder, Frame};
use reqwest::blocking::Client;
use std::io::{Cursor, Write};
use tracing::{debug, error, info};

/// Decoded synthesis output ready for the playback queue
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    /// Mono samples
    pub samples: Vec<f32>,
    /// Native sample rate of the decoded audio
    pub sample_rate: u32,
}

impl SynthesizedSpeech {
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Synthesizes replies via the Google Translate TTS endpoint
pub struct TranslateTts {
    client: Client,
    endpoint: String,
    language: String,
}

impl TranslateTts {
    pub fn new(endpoint: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            language: language.into(),
        }
    }
}

impl Synthesize for TranslateTts {
    fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech> {
        debug!(chars = text.len(), language = %self.language, "requesting synthesis");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .map_err(|e| {
                error!(error = %e, "synthesis request failed");
                ParleyError::Synthesis(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "synthesis API error");
            return Err(ParleyError::Synthesis(format!("API error {}", status)));
        }

        let mp3 = response
            .bytes()
            .map_err(|e| ParleyError::Synthesis(format!("Failed to read audio body: {}", e)))?;

        // Spool through a temp file that is deleted when the guard drops,
        // even when decoding fails.
        let mut spool = tempfile::NamedTempFile::new()?;
        spool.write_all(&mp3)?;
        let bytes = std::fs::read(spool.path())?;

        let speech = decode_mp3(&bytes)?;
        info!(
            duration_secs = speech.duration_seconds(),
            sample_rate = speech.sample_rate,
            "synthesis complete"
        );
        Ok(speech)
    }
}

/// Decode MP3 bytes into mono f32 samples
pub fn decode_mp3(bytes: &[u8]) -> Result<SynthesizedSpeech> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: rate,
                channels,
                ..
            }) => {
                sample_rate = rate as u32;
                if channels <= 1 {
                    samples.extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
                } else {
                    for frame in data.chunks(channels) {
                        let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                        samples.push(sum as f32 / (channels as i32 * i16::MAX as i32) as f32);
                    }
                }
            }
            Err(minimp3::Error::Eof) => break,
            // Leading ID3 tags or junk between frames; keep scanning.
            Err(minimp3::Error::SkippedData) => continue,
            Err(e) => {
                return Err(ParleyError::Synthesis(format!("MP3 decode failed: {:?}", e)));
            }
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(ParleyError::Synthesis("Decoded audio was empty".into()));
    }

    Ok(SynthesizedSpeech {
        samples,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(decode_mp3(&[0u8; 64]).is_err());
    }

    #[test]
    fn test_duration() {
        let speech = SynthesizedSpeech {
            samples: vec![0.0; 24000],
            sample_rate: 24000,
        };
        assert!((speech.duration_seconds() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duration_with_zero_rate() {
        let speech = SynthesizedSpeech {
            samples: vec![0.0; 100],
            sample_rate: 0,
        };
        assert_eq!(speech.duration_seconds(), 0.0);
    }
}
