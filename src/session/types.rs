use serde::{Deserialize, Serialize};

/// Role tag used on the chat completion wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the conversation transcript, sent verbatim to the
/// chat completion endpoint in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Who a rendered chat bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Bot,
}

/// One rendered line of the conversation (speaker, HH:MM timestamp, text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub timestamp: String,
    pub text: String,
}

impl ChatEntry {
    pub fn new(speaker: Speaker, timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker,
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }
}

/// The chat models the user can pick between in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatModel {
    Gpt4,
    Gpt35Turbo,
}

impl ChatModel {
    /// All selectable models, in sidebar order
    pub const ALL: [ChatModel; 2] = [ChatModel::Gpt4, ChatModel::Gpt35Turbo];

    /// The identifier sent to the chat completion endpoint
    pub fn id(self) -> &'static str {
        match self {
            ChatModel::Gpt4 => "gpt-4",
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

/// A recorded utterance: mono samples plus the rate they were captured at.
///
/// Owned exclusively by the turn that produced it; element-wise equality
/// against the last accepted buffer is what suppresses duplicate turns.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl CapturedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self { samples, sample_rate, channels }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");

        let sys = serde_json::to_value(ChatMessage::system("seed")).unwrap();
        assert_eq!(sys["role"], "system");
        let asst = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(asst["role"], "assistant");
    }

    #[test]
    fn test_model_identifiers() {
        assert_eq!(ChatModel::Gpt4.id(), "gpt-4");
        assert_eq!(ChatModel::Gpt35Turbo.id(), "gpt-3.5-turbo");
        assert_eq!(ChatModel::ALL.len(), 2);
    }

    #[test]
    fn test_captured_audio_equality() {
        let a = CapturedAudio::new(vec![0.1, 0.2], 16000, 1);
        let b = CapturedAudio::new(vec![0.1, 0.2], 16000, 1);
        let c = CapturedAudio::new(vec![0.1, 0.3], 16000, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_captured_audio_duration() {
        let audio = CapturedAudio::new(vec![0.0; 32000], 16000, 1);
        assert!((audio.duration_seconds() - 2.0).abs() < f32::EPSILON);
        assert!(!audio.is_empty());
        assert!(CapturedAudio::new(Vec::new(), 16000, 1).is_empty());
    }
}
