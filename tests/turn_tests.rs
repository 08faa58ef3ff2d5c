//! End-to-end turn accounting with mock remote backends
//!
//! Exercises the capture -> transcribe -> generate -> synthesize flow
//! against the session invariants: how many messages each outcome
//! commits, duplicate-recording suppression, and reset behavior.

use parley::api::{Complete, Synthesize, SynthesizedSpeech, Transcribe};
use parley::pipeline::process_capture;
use parley::session::{
    CapturedAudio, ChatMessage, ChatModel, Role, SharedSession, Speaker, SEED_PROMPT,
};
use parley::{ParleyError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct MockStt {
    calls: AtomicUsize,
    fail: bool,
    text: String,
}

impl MockStt {
    fn returning(text: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            text: text.to_string(),
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
            text: String::new(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcribe for MockStt {
    fn transcribe(&self, _api_key: &str, wav_path: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // The scoped upload file must exist for the duration of the call.
        assert!(wav_path.exists());
        if self.fail {
            Err(ParleyError::Transcription("API error 401: unauthorized".into()))
        } else {
            Ok(self.text.clone())
        }
    }
}

struct MockChat {
    calls: AtomicUsize,
    fail: bool,
    reply: String,
    seen_payloads: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChat {
    fn returning(reply: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            reply: reply.to_string(),
            seen_payloads: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
            reply: String::new(),
            seen_payloads: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Complete for MockChat {
    fn complete(
        &self,
        _api_key: &str,
        _model: ChatModel,
        messages: &[ChatMessage],
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_payloads.lock().unwrap().push(messages.to_vec());
        if self.fail {
            Err(ParleyError::Completion("API error 503: unavailable".into()))
        } else {
            Ok(self.reply.clone())
        }
    }
}

struct MockTts {
    calls: AtomicUsize,
    fail: bool,
}

impl MockTts {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Synthesize for MockTts {
    fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ParleyError::Synthesis("API error 429: rate limited".into()))
        } else {
            Ok(SynthesizedSpeech {
                samples: vec![0.0; 2400],
                sample_rate: 24000,
            })
        }
    }
}

/// A capture at the upload rate so tests skip the resampler
fn utterance(seed: f32) -> CapturedAudio {
    let samples: Vec<f32> = (0..1600)
        .map(|i| ((i as f32 + seed) * 0.01).sin() * 0.5)
        .collect();
    CapturedAudio::new(samples, 16000, 1)
}

#[test]
fn successful_turn_appends_user_and_assistant() {
    let session = SharedSession::new();
    let stt = MockStt::returning("hello");
    let chat = MockChat::returning("hi there");
    let tts = MockTts::ok();

    let outcome = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        utterance(1.0),
    )
    .unwrap()
    .expect("turn should be accepted");

    assert_eq!(outcome.transcript, "hello");
    assert_eq!(outcome.reply, "hi there");

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], ChatMessage::system(SEED_PROMPT));
    assert_eq!(messages[1], ChatMessage::user("hello"));
    assert_eq!(messages[2], ChatMessage::assistant("hi there"));

    let log = session.chat_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].speaker, Speaker::User);
    assert_eq!(log[0].text, "hello");
    assert_eq!(log[1].speaker, Speaker::Bot);
    assert_eq!(log[1].text, "hi there");
    // Same timestamp granularity on both entries
    assert_eq!(log[0].timestamp.len(), 5);
    assert_eq!(log[1].timestamp.len(), 5);
}

#[test]
fn transcription_failure_leaves_session_unchanged() {
    let session = SharedSession::new();
    let stt = MockStt::failing();
    let chat = MockChat::returning("unused");
    let tts = MockTts::ok();

    let err = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        utterance(2.0),
    )
    .unwrap_err();

    assert!(matches!(err, ParleyError::Transcription(_)));
    assert_eq!(session.message_count(), 1);
    assert!(session.chat_log().is_empty());
    assert_eq!(chat.calls(), 0);
    assert_eq!(tts.calls(), 0);
}

#[test]
fn completion_failure_commits_user_message_only() {
    let session = SharedSession::new();
    let stt = MockStt::returning("hello");
    let chat = MockChat::failing();
    let tts = MockTts::ok();

    let err = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt35Turbo,
        utterance(3.0),
    )
    .unwrap_err();

    assert!(matches!(err, ParleyError::Completion(_)));
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], ChatMessage::user("hello"));
    assert_eq!(session.chat_log().len(), 1);
    assert_eq!(tts.calls(), 0);
}

#[test]
fn synthesis_failure_commits_user_message_only() {
    let session = SharedSession::new();
    let stt = MockStt::returning("hello");
    let chat = MockChat::returning("hi there");
    let tts = MockTts::failing();

    let err = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        utterance(4.0),
    )
    .unwrap_err();

    assert!(matches!(err, ParleyError::Synthesis(_)));
    // The reply is never committed when it cannot be spoken.
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(session.chat_log().len(), 1);
}

#[test]
fn identical_recording_never_processed_twice() {
    let session = SharedSession::new();
    let stt = MockStt::returning("hello");
    let chat = MockChat::returning("hi there");
    let tts = MockTts::ok();
    let audio = utterance(5.0);

    let first = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        audio.clone(),
    )
    .unwrap();
    assert!(first.is_some());

    let second = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        audio,
    )
    .unwrap();
    assert!(second.is_none());

    assert_eq!(stt.calls(), 1);
    assert_eq!(chat.calls(), 1);
    assert_eq!(tts.calls(), 1);
    assert_eq!(session.message_count(), 3);
}

#[test]
fn failed_recording_is_not_retried() {
    let session = SharedSession::new();
    let stt = MockStt::failing();
    let chat = MockChat::returning("unused");
    let tts = MockTts::ok();
    let audio = utterance(6.0);

    assert!(process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        audio.clone(),
    )
    .is_err());

    // The buffer was marked seen before the failing call, so the same
    // recording does not start another cycle.
    let retry = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        audio,
    )
    .unwrap();
    assert!(retry.is_none());
    assert_eq!(stt.calls(), 1);
}

#[test]
fn empty_capture_is_ignored() {
    let session = SharedSession::new();
    let stt = MockStt::returning("unused");
    let chat = MockChat::returning("unused");
    let tts = MockTts::ok();

    let outcome = process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        CapturedAudio::new(Vec::new(), 16000, 1),
    )
    .unwrap();

    assert!(outcome.is_none());
    assert_eq!(stt.calls(), 0);
    assert_eq!(session.message_count(), 1);
}

#[test]
fn full_history_is_resent_each_turn() {
    let session = SharedSession::new();
    let stt = MockStt::returning("again");
    let chat = MockChat::returning("reply");
    let tts = MockTts::ok();

    for turn in 0..3 {
        process_capture(
            &session,
            &stt,
            &chat,
            &tts,
            "sk-test",
            ChatModel::Gpt4,
            utterance(turn as f32 * 10.0 + 7.0),
        )
        .unwrap()
        .expect("turn should be accepted");
    }

    let payloads = chat.seen_payloads.lock().unwrap();
    assert_eq!(payloads.len(), 3);
    // Payload grows monotonically: seed + full history + the new user
    // message, with nothing windowed away.
    assert_eq!(payloads[0].len(), 2);
    assert_eq!(payloads[1].len(), 4);
    assert_eq!(payloads[2].len(), 6);
    for payload in payloads.iter() {
        assert_eq!(payload[0], ChatMessage::system(SEED_PROMPT));
        assert_eq!(payload.last().unwrap().role, Role::User);
    }
}

#[test]
fn reset_mid_conversation_restores_seed() {
    let session = SharedSession::new();
    let stt = MockStt::returning("question");
    let chat = MockChat::returning("answer");
    let tts = MockTts::ok();

    for turn in 0..2 {
        process_capture(
            &session,
            &stt,
            &chat,
            &tts,
            "sk-test",
            ChatModel::Gpt4,
            utterance(turn as f32 * 10.0 + 50.0),
        )
        .unwrap()
        .expect("turn should be accepted");
    }
    assert!(session.message_count() > 3);

    session.reset();

    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0], ChatMessage::system(SEED_PROMPT));
    assert!(session.chat_log().is_empty());
}

#[test]
fn system_seed_survives_every_turn() {
    let session = SharedSession::new();
    let stt = MockStt::returning("hello");
    let chat = MockChat::returning("hi");
    let tts = MockTts::ok();

    assert_eq!(session.messages()[0].role, Role::System);

    process_capture(
        &session,
        &stt,
        &chat,
        &tts,
        "sk-test",
        ChatModel::Gpt4,
        utterance(90.0),
    )
    .unwrap();
    assert_eq!(session.messages()[0].role, Role::System);

    session.reset();
    assert_eq!(session.messages()[0].role, Role::System);
}
