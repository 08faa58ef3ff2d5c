//! Configuration for the assistant
//!
//! Endpoints, model identifiers and audio rates used across the pipeline.
//! The API credential is not configured here; it is entered interactively
//! in the sidebar and forwarded to the pipeline at runtime.

use crate::session::ChatModel;
use crate::{ParleyError, Result};

/// Sample rate the transcription endpoint expects uploads at.
pub const UPLOAD_SAMPLE_RATE: u32 = 16000;

/// Configuration for the complete assistant
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Transcription endpoint URL
    pub stt_endpoint: String,

    /// Fixed transcription model identifier
    pub stt_model: String,

    /// Chat completion endpoint URL
    pub chat_endpoint: String,

    /// Chat model selected until the user picks another
    pub default_model: ChatModel,

    /// Speech synthesis endpoint URL
    pub tts_endpoint: String,

    /// Fixed synthesis language code
    pub tts_language: String,

    /// Sample rate the microphone delivers (usually the input device rate)
    pub capture_sample_rate: u32,

    /// Sample rate audio is resampled to before upload
    pub upload_sample_rate: u32,

    /// Sample rate synthesized speech is resampled to for playback
    pub playback_sample_rate: u32,

    /// Whether to capture from the default input device
    pub enable_audio_input: bool,

    /// Whether to play replies on the default output device
    pub enable_audio_output: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            stt_endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            stt_model: "whisper-1".to_string(),
            chat_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            default_model: ChatModel::Gpt4,
            tts_endpoint: "https://translate.google.com/translate_tts".to_string(),
            tts_language: "ko".to_string(),
            capture_sample_rate: 48000,
            upload_sample_rate: UPLOAD_SAMPLE_RATE,
            playback_sample_rate: 48000,
            enable_audio_input: true,
            enable_audio_output: true,
        }
    }
}

impl AssistantConfig {
    /// Set the synthesis language code
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.tts_language = language.into();
        self
    }

    /// Set the default chat model
    pub fn with_default_model(mut self, model: ChatModel) -> Self {
        self.default_model = model;
        self
    }

    /// Set the playback sample rate (usually the output device rate)
    pub fn with_playback_sample_rate(mut self, rate: u32) -> Self {
        self.playback_sample_rate = rate;
        self
    }

    /// Set the capture sample rate (usually the input device rate)
    pub fn with_capture_sample_rate(mut self, rate: u32) -> Self {
        self.capture_sample_rate = rate;
        self
    }

    /// Disable audio input (useful in tests)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Disable audio output (useful in tests)
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.stt_endpoint.is_empty() || self.chat_endpoint.is_empty() || self.tts_endpoint.is_empty() {
            return Err(ParleyError::Config("Endpoint URLs must not be empty".into()));
        }
        if self.tts_language.is_empty() {
            return Err(ParleyError::Config("Synthesis language must not be empty".into()));
        }
        if self.capture_sample_rate == 0
            || self.upload_sample_rate == 0
            || self.playback_sample_rate == 0
        {
            return Err(ParleyError::Config("Sample rates must be greater than 0".into()));
        }
        Ok(())
    }
}
