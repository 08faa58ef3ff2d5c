//! UI-side state
//!
//! Mirrors what the pipeline reports and forwards user actions as
//! commands. The conversation itself is read straight from the shared
//! session each frame; nothing here talks to the network.

use crate::pipeline::{PipelineCommand, PipelineEvent, PipelineHandle};
use crate::session::{ChatEntry, ChatModel, SharedSession};
use tracing::warn;

/// Where the record control currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPhase {
    /// Not recording
    Idle,
    /// Microphone is live
    Recording,
    /// A turn is running (transcribe, generate, synthesize)
    Processing,
}

/// Central UI state
pub struct UiState {
    handle: PipelineHandle,
    session: SharedSession,

    /// Credential typed into the sidebar
    pub api_key: String,

    /// Model picked in the sidebar radio
    pub selected_model: ChatModel,

    /// Record control phase
    pub phase: RecordPhase,

    /// Most recent recognized utterance, for the status line
    pub last_heard: Option<String>,

    /// Most recent turn failure, for the status line
    pub last_error: Option<String>,
}

impl UiState {
    pub fn new(handle: PipelineHandle, session: SharedSession, default_model: ChatModel) -> Self {
        Self {
            handle,
            session,
            api_key: String::new(),
            selected_model: default_model,
            phase: RecordPhase::Idle,
            last_heard: None,
            last_error: None,
        }
    }

    /// Snapshot of the conversation for rendering
    pub fn chat_log(&self) -> Vec<ChatEntry> {
        self.session.chat_log()
    }

    /// Record button pressed: start or finish a recording
    pub fn toggle_recording(&mut self) {
        match self.phase {
            RecordPhase::Idle => {
                // Forward the credential as typed so the turn uses the
                // current value.
                self.send(PipelineCommand::SetApiKey(self.api_key.clone()));
                self.send(PipelineCommand::BeginRecording);
            }
            RecordPhase::Recording => {
                self.send(PipelineCommand::FinishRecording);
            }
            RecordPhase::Processing => {}
        }
    }

    /// Escape pressed while recording
    pub fn cancel_recording(&mut self) {
        if self.phase == RecordPhase::Recording {
            self.send(PipelineCommand::CancelRecording);
        }
    }

    /// Sidebar radio changed
    pub fn select_model(&mut self, model: ChatModel) {
        if self.selected_model != model {
            self.selected_model = model;
            self.send(PipelineCommand::SelectModel(model));
        }
    }

    /// Sidebar reset button pressed
    pub fn reset_session(&mut self) {
        self.send(PipelineCommand::Reset);
    }

    /// Whether a turn is currently in flight
    pub fn is_busy(&self) -> bool {
        self.phase != RecordPhase::Idle
    }

    /// Drain pipeline events into UI state
    pub fn poll_events(&mut self) {
        while let Some(event) = self.handle.try_recv_event() {
            match event {
                PipelineEvent::RecordingStarted => {
                    self.phase = RecordPhase::Recording;
                }
                PipelineEvent::RecordingStopped => {
                    self.phase = RecordPhase::Processing;
                }
                PipelineEvent::RecordingCancelled => {
                    self.phase = RecordPhase::Idle;
                }
                PipelineEvent::Transcribed { text, .. } => {
                    self.last_heard = Some(text);
                }
                PipelineEvent::TurnCompleted { .. } => {
                    self.phase = RecordPhase::Idle;
                    self.last_error = None;
                }
                PipelineEvent::TurnFailed { error, .. } => {
                    self.phase = RecordPhase::Idle;
                    self.last_error = Some(error);
                }
                PipelineEvent::SessionCleared => {
                    self.last_heard = None;
                    self.last_error = None;
                }
                PipelineEvent::Shutdown => {
                    self.phase = RecordPhase::Idle;
                }
            }
        }
    }

    fn send(&mut self, cmd: PipelineCommand) {
        if let Err(e) = self.handle.send(cmd) {
            warn!(error = %e, "pipeline command dropped");
            self.last_error = Some(e.to_string());
        }
    }
}
