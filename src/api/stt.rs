//! Whisper transcription adapter
//!
//! Multipart POST of the recorded WAV to the OpenAI transcription
//! endpoint with a fixed model identifier.

use super::Transcribe;
use crate::{ParleyError, Result};
use reqwest::blocking::multipart;
use reqwest::blocking::Client;
use std::path::Path;
use tracing::{debug, error, info};

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes recorded utterances via the remote Whisper API
pub struct WhisperTranscriber {
    client: Client,
    endpoint: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Transcribe for WhisperTranscriber {
    fn transcribe(&self, api_key: &str, wav_path: &Path) -> Result<String> {
        if api_key.is_empty() {
            return Err(ParleyError::Config("OpenAI API key is not set".into()));
        }

        let wav_bytes = std::fs::read(wav_path)?;
        debug!(audio_bytes = wav_bytes.len(), "starting transcription");

        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(wav_bytes)
                    .file_name("speech.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| ParleyError::Transcription(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .map_err(|e| {
                error!(error = %e, "transcription request failed");
                ParleyError::Transcription(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = %status, body = %body, "transcription API error");
            return Err(ParleyError::Transcription(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response
            .json()
            .map_err(|e| ParleyError::Transcription(format!("Malformed response: {}", e)))?;

        info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
