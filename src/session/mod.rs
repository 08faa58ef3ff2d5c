pub mod context;
pub mod types;

pub use context::{SessionContext, SharedSession, SEED_PROMPT};
pub use types::{CapturedAudio, ChatEntry, ChatMessage, ChatModel, Role, Speaker};
