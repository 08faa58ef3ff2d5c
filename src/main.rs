use anyhow::Result;
use parley::api::{ChatClient, TranslateTts, WhisperTranscriber};
use parley::config::AssistantConfig;
use parley::pipeline::{Pipeline, PipelineCommand};
use parley::session::SharedSession;
use parley::ui::ParleyApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley voice assistant");

    #[allow(unused_mut)]
    let mut config = AssistantConfig::default();

    #[cfg(feature = "audio-io")]
    let mut capture = parley::audio::MicCapture::new()?;
    #[cfg(feature = "audio-io")]
    let mut speaker = parley::audio::SpeakerOutput::new()?;

    #[cfg(feature = "audio-io")]
    {
        config = config
            .with_capture_sample_rate(capture.sample_rate())
            .with_playback_sample_rate(speaker.sample_rate());
    }

    config.validate()?;

    let session = SharedSession::new();
    let stt = WhisperTranscriber::new(&config.stt_endpoint, &config.stt_model);
    let chat = ChatClient::new(&config.chat_endpoint);
    let tts = TranslateTts::new(&config.tts_endpoint, &config.tts_language);

    let default_model = config.default_model;
    let (pipeline, handle) = Pipeline::new(
        config.clone(),
        session.clone(),
        Box::new(stt),
        Box::new(chat),
        Box::new(tts),
    );

    #[cfg(feature = "audio-io")]
    {
        if config.enable_audio_input {
            capture.start(handle.audio_sender(), handle.recording_flag())?;
        }
        if config.enable_audio_output {
            speaker.start(handle.playback_receiver())?;
        }
    }

    let shutdown_tx = handle.command_sender();
    let worker = pipeline.start();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Parley",
        native_options,
        Box::new(move |cc| Ok(Box::new(ParleyApp::new(cc, handle, session, default_model)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;

    let _ = shutdown_tx.send(PipelineCommand::Shutdown);
    let _ = worker.join();

    info!("Parley shut down");
    Ok(())
}
