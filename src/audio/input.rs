use crate::{ParleyError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Microphone capture on the default input device.
///
/// The stream runs for the lifetime of the application; the shared
/// `gate` flag decides whether callback samples are forwarded, so
/// record/stop is just a flag flip with no device churn.
pub struct MicCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl MicCapture {
    /// Open the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ParleyError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to get input config: {}", e)))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start the input stream. Samples are down-mixed to mono in the
    /// callback and sent over `audio_tx` whenever `gate` is set.
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>, gate: Arc<AtomicBool>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !gate.load(Ordering::Relaxed) {
                        return;
                    }

                    let samples: Vec<f32> = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = audio_tx.try_send(samples) {
                        debug!("Failed to send captured audio: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| ParleyError::AudioDevice(format!("Failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Microphone capture started");
        Ok(())
    }

    /// Tear down the input stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("Microphone capture stopped");
        }
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
