//! Pipeline worker thread
//!
//! Owns the session context and executes turns. The UI talks to it
//! through commands (one per user action) and reads completion or
//! failure back as events, so a hung remote call never blocks a frame.

use crate::api::{Complete, Synthesize, Transcribe};
use crate::audio::resample_to;
use crate::config::AssistantConfig;
use crate::pipeline::turn::process_capture;
use crate::session::{CapturedAudio, ChatModel, SharedSession};
use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One command per user action
#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Start accumulating microphone samples
    BeginRecording,

    /// Stop recording and run the turn on what was captured
    FinishRecording,

    /// Discard the current recording without processing
    CancelRecording,

    /// Switch the chat model for subsequent turns
    SelectModel(ChatModel),

    /// Update the API credential entered in the sidebar
    SetApiKey(String),

    /// Collapse the session back to its seeded state
    Reset,

    /// Stop the worker
    Shutdown,
}

/// Events reported back to the render layer
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    RecordingStarted,

    /// Recording ended; a turn may now be running
    RecordingStopped,

    RecordingCancelled,

    /// The utterance was recognized
    Transcribed { turn: Uuid, text: String },

    /// The turn finished; session already holds both new messages
    TurnCompleted { turn: Uuid, reply: String },

    /// The turn aborted; the session holds whatever was committed
    /// before the failing call
    TurnFailed { turn: Uuid, error: String },

    /// Reset completed
    SessionCleared,

    Shutdown,
}

/// Handle for driving the pipeline from the UI and audio layers
pub struct PipelineHandle {
    command_tx: Sender<PipelineCommand>,
    event_rx: Receiver<PipelineEvent>,
    audio_tx: Sender<Vec<f32>>,
    playback_rx: Receiver<Vec<f32>>,
    recording: Arc<AtomicBool>,
}

impl PipelineHandle {
    pub fn send(&self, cmd: PipelineCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ParleyError::Channel(format!("Failed to send command: {}", e)))
    }

    pub fn try_recv_event(&self) -> Option<PipelineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// A dedicated command sender, e.g. for shutdown after the UI exits
    pub fn command_sender(&self) -> Sender<PipelineCommand> {
        self.command_tx.clone()
    }

    /// Sender the microphone callback feeds
    pub fn audio_sender(&self) -> Sender<Vec<f32>> {
        self.audio_tx.clone()
    }

    /// Receiver the speaker output drains
    pub fn playback_receiver(&self) -> Receiver<Vec<f32>> {
        self.playback_rx.clone()
    }

    /// Flag gating the microphone callback
    pub fn recording_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.recording)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }
}

/// The worker itself; consumed by `start`
pub struct Pipeline {
    config: AssistantConfig,
    session: SharedSession,
    stt: Box<dyn Transcribe>,
    chat: Box<dyn Complete>,
    tts: Box<dyn Synthesize>,
    command_rx: Receiver<PipelineCommand>,
    event_tx: Sender<PipelineEvent>,
    audio_rx: Receiver<Vec<f32>>,
    playback_tx: Sender<Vec<f32>>,
    recording: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(
        config: AssistantConfig,
        session: SharedSession,
        stt: Box<dyn Transcribe>,
        chat: Box<dyn Complete>,
        tts: Box<dyn Synthesize>,
    ) -> (Self, PipelineHandle) {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);
        let (audio_tx, audio_rx) = bounded(1000);
        let (playback_tx, playback_rx) = bounded(1000);
        let recording = Arc::new(AtomicBool::new(false));

        let handle = PipelineHandle {
            command_tx,
            event_rx,
            audio_tx,
            playback_rx,
            recording: Arc::clone(&recording),
        };

        let pipeline = Self {
            config,
            session,
            stt,
            chat,
            tts,
            command_rx,
            event_tx,
            audio_rx,
            playback_tx,
            recording,
        };

        (pipeline, handle)
    }

    /// Spawn the worker thread
    pub fn start(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    fn run(self) {
        info!("Pipeline worker started");

        let mut api_key = String::new();
        let mut model = self.config.default_model;
        let mut accumulator: Vec<f32> = Vec::with_capacity(self.config.capture_sample_rate as usize * 30);

        loop {
            match self.command_rx.try_recv() {
                Ok(PipelineCommand::BeginRecording) => {
                    accumulator.clear();
                    self.recording.store(true, Ordering::SeqCst);
                    let _ = self.event_tx.send(PipelineEvent::RecordingStarted);
                    debug!("recording started");
                }
                Ok(PipelineCommand::FinishRecording) => {
                    self.recording.store(false, Ordering::SeqCst);
                    self.drain_audio(&mut accumulator);
                    let _ = self.event_tx.send(PipelineEvent::RecordingStopped);
                    debug!(samples = accumulator.len(), "recording stopped");

                    let audio = CapturedAudio::new(
                        std::mem::take(&mut accumulator),
                        self.config.capture_sample_rate,
                        1,
                    );
                    self.execute_turn(&api_key, model, audio);
                }
                Ok(PipelineCommand::CancelRecording) => {
                    self.recording.store(false, Ordering::SeqCst);
                    accumulator.clear();
                    while self.audio_rx.try_recv().is_ok() {}
                    let _ = self.event_tx.send(PipelineEvent::RecordingCancelled);
                    debug!("recording cancelled");
                }
                Ok(PipelineCommand::SelectModel(selected)) => {
                    model = selected;
                    debug!(model = model.id(), "chat model selected");
                }
                Ok(PipelineCommand::SetApiKey(key)) => {
                    api_key = key;
                }
                Ok(PipelineCommand::Reset) => {
                    self.session.reset();
                    let _ = self.event_tx.send(PipelineEvent::SessionCleared);
                    info!("session reset");
                }
                Ok(PipelineCommand::Shutdown) => {
                    let _ = self.event_tx.send(PipelineEvent::Shutdown);
                    break;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    warn!("command channel disconnected");
                    break;
                }
            }

            if self.recording.load(Ordering::SeqCst) {
                self.drain_audio(&mut accumulator);
            }

            thread::sleep(std::time::Duration::from_millis(10));
        }

        info!("Pipeline worker stopped");
    }

    fn drain_audio(&self, accumulator: &mut Vec<f32>) {
        while let Ok(samples) = self.audio_rx.try_recv() {
            accumulator.extend_from_slice(&samples);
        }
    }

    fn execute_turn(&self, api_key: &str, model: ChatModel, audio: CapturedAudio) {
        let turn = Uuid::new_v4();

        match process_capture(
            &self.session,
            self.stt.as_ref(),
            self.chat.as_ref(),
            self.tts.as_ref(),
            api_key,
            model,
            audio,
        ) {
            Ok(Some(outcome)) => {
                let _ = self.event_tx.send(PipelineEvent::Transcribed {
                    turn,
                    text: outcome.transcript.clone(),
                });
                self.enqueue_playback(&outcome.speech.samples, outcome.speech.sample_rate);
                let _ = self.event_tx.send(PipelineEvent::TurnCompleted {
                    turn,
                    reply: outcome.reply,
                });
            }
            Ok(None) => {
                debug!("capture ignored");
            }
            Err(e) => {
                warn!(error = %e, "turn aborted");
                let _ = self.event_tx.send(PipelineEvent::TurnFailed {
                    turn,
                    error: e.to_string(),
                });
            }
        }
    }

    fn enqueue_playback(&self, samples: &[f32], sample_rate: u32) {
        if !self.config.enable_audio_output {
            return;
        }

        match resample_to(samples, sample_rate, self.config.playback_sample_rate) {
            Ok(resampled) => {
                if self.playback_tx.try_send(resampled).is_err() {
                    warn!("playback queue full, dropping reply audio");
                }
            }
            Err(e) => warn!(error = %e, "failed to resample reply audio"),
        }
    }
}
