pub mod api;
pub mod audio;
pub mod config;
pub mod pipeline;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Chat completion error: {0}")]
    Completion(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
