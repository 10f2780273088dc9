//! Energy-based utterance segmentation
//!
//! Splits a continuous mono stream into utterances: a run of frames whose
//! RMS crosses a threshold, closed by a stretch of trailing silence.

use std::mem;

/// Segmentation thresholds
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// Frame RMS at or above which a frame counts as speech
    pub threshold: f32,
    /// Analysis frame length
    pub frame_ms: u32,
    /// Utterances with less speech than this are discarded as clicks
    pub min_speech_ms: u32,
    /// Silence that closes an utterance
    pub trailing_silence_ms: u32,
    /// Hard cap on utterance length
    pub max_utterance_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            frame_ms: 30,
            min_speech_ms: 150,
            trailing_silence_ms: 450,
            max_utterance_ms: 4_000,
        }
    }
}

/// Streaming utterance detector
pub struct UtteranceSegmenter {
    config: SegmenterConfig,
    frame_len: usize,
    pending: Vec<f32>,
    utterance: Vec<f32>,
    speech_frames: u32,
    silent_frames: u32,
}

impl UtteranceSegmenter {
    pub fn new(sample_rate: u32, config: SegmenterConfig) -> Self {
        let frame_len = (sample_rate as usize * config.frame_ms as usize / 1000).max(1);
        Self {
            config,
            frame_len,
            pending: Vec::with_capacity(frame_len),
            utterance: Vec::new(),
            speech_frames: 0,
            silent_frames: 0,
        }
    }

    /// Feed samples; returns every utterance completed by them
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.pending.extend_from_slice(samples);

        let mut completed = Vec::new();
        let mut offset = 0;
        while self.pending.len() - offset >= self.frame_len {
            let end = offset + self.frame_len;
            let frame = self.pending[offset..end].to_vec();
            if let Some(utterance) = self.push_frame(&frame) {
                completed.push(utterance);
            }
            offset = end;
        }
        self.pending.drain(..offset);

        completed
    }

    /// Drop any partial utterance
    pub fn reset(&mut self) {
        self.pending.clear();
        self.utterance.clear();
        self.speech_frames = 0;
        self.silent_frames = 0;
    }

    /// Whether speech has started and not yet closed
    pub fn in_utterance(&self) -> bool {
        !self.utterance.is_empty()
    }

    fn push_frame(&mut self, frame: &[f32]) -> Option<Vec<f32>> {
        let loud = rms(frame) >= self.config.threshold;
        if !loud && !self.in_utterance() {
            return None;
        }

        self.utterance.extend_from_slice(frame);
        if loud {
            self.speech_frames += 1;
            self.silent_frames = 0;
        } else {
            self.silent_frames += 1;
        }

        let total_frames = (self.utterance.len() / self.frame_len) as u32;
        let closed = self.silent_frames * self.config.frame_ms >= self.config.trailing_silence_ms
            || total_frames * self.config.frame_ms >= self.config.max_utterance_ms;

        if closed {
            self.finish()
        } else {
            None
        }
    }

    fn finish(&mut self) -> Option<Vec<f32>> {
        let utterance = mem::take(&mut self.utterance);
        let speech_ms = self.speech_frames * self.config.frame_ms;
        self.speech_frames = 0;
        self.silent_frames = 0;

        (speech_ms >= self.config.min_speech_ms).then_some(utterance)
    }
}

/// Root mean square of a block of samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}
