//! Session-scoped conversation state
//!
//! One `SessionContext` exists per interactive session. It holds the wire
//! transcript (`messages`), the render log (`chat_log`) and the last
//! accepted recording. Reset collapses everything back to the seed.

use super::types::{CapturedAudio, ChatEntry, ChatMessage, Speaker};
use chrono::Local;
use parking_lot::RwLock;
use std::sync::Arc;

/// The seed system instruction. `messages[0]` is always exactly this.
pub const SEED_PROMPT: &str =
    "You are a thoughtful assistant. Respond to all input in 25 words and answer in Korean.";

/// Conversation state for one session
#[derive(Debug, Clone)]
pub struct SessionContext {
    messages: Vec<ChatMessage>,
    chat_log: Vec<ChatEntry>,
    last_seen_audio: Option<CapturedAudio>,
}

impl SessionContext {
    /// Create a freshly seeded session
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::system(SEED_PROMPT)],
            chat_log: Vec::new(),
            last_seen_audio: None,
        }
    }

    /// Restore the seeded initial state. Unconditional and total: the
    /// transcript collapses to the single seed message, the render log
    /// empties, and the duplicate-suppression buffer is forgotten.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::system(SEED_PROMPT)];
        self.chat_log.clear();
        self.last_seen_audio = None;
    }

    /// Whether a captured buffer should start a new turn: it must be
    /// non-empty and not element-wise identical to the last accepted one.
    pub fn accepts(&self, audio: &CapturedAudio) -> bool {
        if audio.is_empty() {
            return false;
        }
        match &self.last_seen_audio {
            Some(seen) => seen != audio,
            None => true,
        }
    }

    /// Record a buffer as processed, before any downstream call runs,
    /// so the same recording is never transcribed twice.
    pub fn mark_seen(&mut self, audio: CapturedAudio) {
        self.last_seen_audio = Some(audio);
    }

    /// Append the recognized user utterance to both the wire transcript
    /// and the render log.
    pub fn push_user(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.messages.push(ChatMessage::user(text.clone()));
        self.chat_log.push(ChatEntry::new(Speaker::User, wall_clock(), text));
    }

    /// Append the assistant reply to both the wire transcript and the
    /// render log.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.messages.push(ChatMessage::assistant(text.clone()));
        self.chat_log.push(ChatEntry::new(Speaker::Bot, wall_clock(), text));
    }

    /// The full ordered transcript, seed message first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The render log, oldest entry first
    pub fn chat_log(&self) -> &[ChatEntry] {
        &self.chat_log
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// HH:MM timestamp for render log entries
fn wall_clock() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Thread-safe handle to the session, shared between the pipeline worker
/// (writer) and the UI (reader)
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<SessionContext>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionContext::new())),
        }
    }

    pub fn reset(&self) {
        self.inner.write().reset();
    }

    pub fn accepts(&self, audio: &CapturedAudio) -> bool {
        self.inner.read().accepts(audio)
    }

    pub fn mark_seen(&self, audio: CapturedAudio) {
        self.inner.write().mark_seen(audio);
    }

    pub fn push_user(&self, text: impl Into<String>) {
        self.inner.write().push_user(text);
    }

    pub fn push_assistant(&self, text: impl Into<String>) {
        self.inner.write().push_assistant(text);
    }

    /// Snapshot of the wire transcript
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read().messages().to_vec()
    }

    /// Snapshot of the render log
    pub fn chat_log(&self) -> Vec<ChatEntry> {
        self.inner.read().chat_log().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.inner.read().messages().len()
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new()
    }
}
