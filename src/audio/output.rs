use crate::{ParleyError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

/// Speaker playback on the default output device.
///
/// Synthesized replies arrive as blocks of mono samples on a channel;
/// a feeder thread appends them to a shared queue which the output
/// callback drains, padding with silence when the queue runs dry.
pub struct SpeakerOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl SpeakerOutput {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| ParleyError::AudioDevice("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to get output config: {}", e)))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Sample rate of the output device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start draining `playback_rx` into the output device
    pub fn start(&mut self, playback_rx: Receiver<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let queue: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::new()));
        let feeder_queue = Arc::clone(&queue);

        std::thread::spawn(move || {
            while let Ok(samples) = playback_rx.recv() {
                feeder_queue.lock().extend_from_slice(&samples);
            }
        });

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut queued = queue.lock();
                    let frames = data.len() / channels;
                    let available = queued.len().min(frames);

                    for (i, frame) in data.chunks_mut(channels).enumerate().take(available) {
                        frame.fill(queued[i]);
                    }
                    queued.drain(0..available);

                    for sample in data.iter_mut().skip(available * channels) {
                        *sample = 0.0;
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to start output stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Speaker playback started");
        Ok(())
    }

    /// Tear down the output stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("Speaker playback stopped");
        }
    }
}

impl Drop for SpeakerOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
