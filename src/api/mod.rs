//! Remote service adapters
//!
//! The three endpoints the assistant delegates to, behind small traits so
//! the turn logic can be exercised with mock backends.

pub mod chat;
pub mod stt;
pub mod tts;

pub use chat::ChatClient;
pub use stt::WhisperTranscriber;
pub use tts::{SynthesizedSpeech, TranslateTts};

use crate::session::{ChatMessage, ChatModel};
use crate::Result;
use std::path::Path;

/// Speech-to-text over a recorded WAV file
pub trait Transcribe: Send {
    fn transcribe(&self, api_key: &str, wav_path: &Path) -> Result<String>;
}

/// Chat completion over the full ordered transcript
pub trait Complete: Send {
    fn complete(&self, api_key: &str, model: ChatModel, messages: &[ChatMessage]) -> Result<String>;
}

/// Text-to-speech for the assistant reply
pub trait Synthesize: Send {
    fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech>;
}
