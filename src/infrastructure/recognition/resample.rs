//! Sample rate conversion for captured audio

use rubato::{FftFixedIn, Resampler};

use crate::application::ports::RecognitionError;

/// Sample rate speech models expect
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Input frames handed to the resampler per call
const CHUNK_SIZE: usize = 1024;

/// Resample mono audio from `source_rate` to [`TARGET_SAMPLE_RATE`]
pub fn resample_to_target(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, RecognitionError> {
    if source_rate == TARGET_SAMPLE_RATE || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        CHUNK_SIZE,
        2, // Sub-chunks
        1, // Mono
    )
    .map_err(|e| RecognitionError::ProcessingFailed(format!("Resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len + CHUNK_SIZE);
    let mut input_pos = 0;

    while input_pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples.len());

        let mut chunk = samples[input_pos..end_pos].to_vec();
        // Last chunk is zero padded
        chunk.resize(frames_needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| RecognitionError::ProcessingFailed(format!("Resampling failed: {}", e)))?;

        output.extend_from_slice(&resampled[0]);
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_rate_is_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_to_target(&samples, TARGET_SAMPLE_RATE).unwrap(), samples);
    }

    #[test]
    fn empty_input() {
        assert!(resample_to_target(&[], 48_000).unwrap().is_empty());
    }

    #[test]
    fn downsample_48k_length() {
        let samples = vec![0.0f32; 48_000];
        let out = resample_to_target(&samples, 48_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn upsample_8k_length() {
        let samples = vec![0.0f32; 4_000];
        let out = resample_to_target(&samples, 8_000).unwrap();
        assert_eq!(out.len(), 8_000);
    }
}
