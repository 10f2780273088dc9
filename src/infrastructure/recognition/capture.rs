//! Microphone capture using cpal
//!
//! The cpal stream is not `Send`, so it is built and kept alive on a
//! dedicated thread; captured audio leaves that thread as mono f32 chunks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};

use super::resample::TARGET_SAMPLE_RATE;
use crate::application::ports::RecognitionError;

/// How often the capture thread checks for a stop request
const CAPTURE_TICK: Duration = Duration::from_millis(50);

/// Running capture from the default input device
pub struct MicrophoneCapture {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl MicrophoneCapture {
    /// Open the default input device and start sending mono chunks into
    /// `chunks`. Chunks are dropped when the receiver falls behind.
    ///
    /// Blocks until the stream is running or has failed to start.
    pub fn start(chunks: SyncSender<Vec<f32>>) -> Result<Self, RecognitionError> {
        let running = Arc::new(AtomicBool::new(true));
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("capture".to_string())
                .spawn(move || {
                    let stream = match open_stream(chunks) {
                        Ok((stream, sample_rate)) => {
                            let _ = ready_tx.send(Ok(sample_rate));
                            stream
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };

                    while running.load(Ordering::SeqCst) {
                        thread::sleep(CAPTURE_TICK);
                    }
                    drop(stream);
                })
                .map_err(|e| RecognitionError::StartFailed(format!("Failed to spawn thread: {}", e)))?
        };

        let sample_rate = ready_rx.recv().map_err(|_| {
            RecognitionError::StartFailed("Capture thread exited before starting".to_string())
        })??;

        tracing::debug!(sample_rate, "microphone capture started");
        Ok(Self {
            running,
            thread: Some(thread),
            sample_rate,
        })
    }

    /// Device sample rate of the delivered chunks
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stop capturing and release the device
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_stream(chunks: SyncSender<Vec<f32>>) -> Result<(cpal::Stream, u32), RecognitionError> {
    let device = get_input_device()?;
    let (config, sample_format) = get_input_config(&device)?;
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    let on_error = |err: cpal::StreamError| tracing::warn!(error = %err, "audio input stream error");

    let stream = match sample_format {
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let samples: Vec<f32> = data.iter().map(|&s| s as f32 / 32768.0).collect();
                forward(&chunks, downmix(&samples, channels));
            },
            on_error,
            None,
        ),
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                forward(&chunks, downmix(data, channels));
            },
            on_error,
            None,
        ),
        other => {
            return Err(RecognitionError::StartFailed(format!(
                "Unsupported sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| RecognitionError::StartFailed(e.to_string()))?;

    stream
        .play()
        .map_err(|e| RecognitionError::StartFailed(e.to_string()))?;

    Ok((stream, sample_rate))
}

fn forward(chunks: &SyncSender<Vec<f32>>, mono: Vec<f32>) {
    if let Err(TrySendError::Full(_)) = chunks.try_send(mono) {
        tracing::trace!("capture consumer behind, dropping chunk");
    }
}

fn get_input_device() -> Result<cpal::Device, RecognitionError> {
    cpal::default_host()
        .default_input_device()
        .ok_or(RecognitionError::NoInputDevice)
}

/// Pick an input config, preferring fewer channels and a range that
/// includes the recognizer's rate.
fn get_input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), RecognitionError> {
    let supported = device
        .supported_input_configs()
        .map_err(|e| RecognitionError::StartFailed(format!("Failed to get configs: {}", e)))?;

    let includes_target = |c: &cpal::SupportedStreamConfigRange| {
        c.min_sample_rate().0 <= TARGET_SAMPLE_RATE && c.max_sample_rate().0 >= TARGET_SAMPLE_RATE
    };

    let mut best: Option<cpal::SupportedStreamConfigRange> = None;
    for config in supported {
        if !matches!(config.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
            continue;
        }

        let is_better = match &best {
            None => true,
            Some(current) => {
                config.channels() < current.channels()
                    || (includes_target(&config) && !includes_target(current))
            }
        };
        if is_better {
            best = Some(config);
        }
    }

    let range = best.ok_or_else(|| {
        RecognitionError::StartFailed("No suitable input config found".to_string())
    })?;

    let sample_rate = if includes_target(&range) {
        SampleRate(TARGET_SAMPLE_RATE)
    } else {
        range.min_sample_rate()
    };

    let config = StreamConfig {
        channels: range.channels(),
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    Ok((config, range.sample_format()))
}

/// Average interleaved frames down to one channel
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn downmix_stereo_averages_frames() {
        let samples = vec![0.25, 0.75, -1.0, 1.0];
        assert_eq!(downmix(&samples, 2), vec![0.5, 0.0]);
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn capture_delivers_chunks() {
        let (tx, rx) = mpsc::sync_channel(16);
        let mut capture = MicrophoneCapture::start(tx).unwrap();
        assert!(capture.sample_rate() > 0);

        let chunk = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(!chunk.is_empty());
        capture.stop();
    }
}
