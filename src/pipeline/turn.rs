//! One turn: capture in, spoken reply out
//!
//! The sequence is strictly ordered: condition and encode the recording,
//! transcribe, commit the user message, generate, synthesize, and only
//! then commit the assistant message. A transcription failure therefore
//! leaves the session untouched, and a generation or synthesis failure
//! leaves exactly the user message behind.

use crate::api::{Complete, Synthesize, SynthesizedSpeech, Transcribe};
use crate::audio::{prepare_for_transcription, write_wav};
use crate::config::UPLOAD_SAMPLE_RATE;
use crate::session::{CapturedAudio, ChatModel, SharedSession};
use crate::Result;
use tracing::{debug, info};

/// Everything a successful turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub transcript: String,
    pub reply: String,
    pub speech: SynthesizedSpeech,
}

/// Run a turn for a captured buffer, if the session accepts it.
///
/// Returns `Ok(None)` when the buffer is empty or identical to the last
/// accepted recording; the buffer is marked as seen before any remote
/// call so the same recording can never be transcribed twice.
pub fn process_capture(
    session: &SharedSession,
    stt: &dyn Transcribe,
    chat: &dyn Complete,
    tts: &dyn Synthesize,
    api_key: &str,
    model: ChatModel,
    audio: CapturedAudio,
) -> Result<Option<TurnOutcome>> {
    if !session.accepts(&audio) {
        debug!(
            samples = audio.samples.len(),
            "capture rejected (empty or already processed)"
        );
        return Ok(None);
    }

    session.mark_seen(audio.clone());
    run_turn(session, stt, chat, tts, api_key, model, &audio).map(Some)
}

fn run_turn(
    session: &SharedSession,
    stt: &dyn Transcribe,
    chat: &dyn Complete,
    tts: &dyn Synthesize,
    api_key: &str,
    model: ChatModel,
    audio: &CapturedAudio,
) -> Result<TurnOutcome> {
    info!(
        duration_secs = audio.duration_seconds(),
        model = model.id(),
        "turn started"
    );

    // Encode the utterance into a scoped temp WAV; the file is removed
    // when the guard drops, whether or not transcription succeeds.
    let prepared = prepare_for_transcription(&audio.samples, audio.sample_rate)?;
    let transcript = {
        let wav = tempfile::Builder::new().suffix(".wav").tempfile()?;
        write_wav(wav.path(), &prepared, UPLOAD_SAMPLE_RATE, 1)?;
        stt.transcribe(api_key, wav.path())?
    };

    session.push_user(&transcript);

    let reply = chat.complete(api_key, model, &session.messages())?;
    let speech = tts.synthesize(&reply)?;

    // Committed only now: a failed generation or synthesis leaves the
    // transcript one user message longer and nothing else.
    session.push_assistant(&reply);

    info!(transcript = %transcript, reply_chars = reply.len(), "turn complete");
    Ok(TurnOutcome {
        transcript,
        reply,
        speech,
    })
}
