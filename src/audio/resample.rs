//! Sample-rate conversion and resample-based pitch shifting.
//!
//! Conversion runs through rubato's FFT resampler in fixed input chunks. The
//! resampler's inherent latency is compensated: zero chunks are fed until the
//! tail has flushed through, the leading delay frames are skipped, and the
//! output is trimmed to exactly `ceil(n * to/from)` frames so lengths stay
//! deterministic across rate round trips.

use rubato::{FftFixedIn, Resampler};

use super::AudioError;

/// Input chunk size fed to the FFT resampler.
const CHUNK: usize = 1024;

/// Sub-chunks per processed chunk.
const SUB_CHUNKS: usize = 2;

/// Rate ratio used to deepen a voice: resample down to 0.8x, then back up.
pub const PITCH_SHIFT_RATIO: f64 = 0.8;

/// Resample mono audio from `from_rate` to `to_rate`.
///
/// Returns exactly `ceil(n * to_rate / from_rate)` samples.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, CHUNK, SUB_CHUNKS, 1)
            .map_err(|e| AudioError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let expected_len =
        (samples.len() as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;
    let mut out = Vec::with_capacity(delay + expected_len + CHUNK);

    let mut pos = 0;
    while pos < samples.len() {
        let end = (pos + CHUNK).min(samples.len());
        // The final chunk is zero-padded up to CHUNK; the overshoot is trimmed below.
        let mut input = vec![0.0f32; CHUNK];
        input[..end - pos].copy_from_slice(&samples[pos..end]);

        let output = resampler
            .process(&[input], None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        out.extend_from_slice(&output[0]);
        pos = end;
    }

    // Feed zero chunks until the delayed tail of the signal has flushed out.
    while out.len() < delay + expected_len {
        let output = resampler
            .process(&[vec![0.0f32; CHUNK]], None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        out.extend_from_slice(&output[0]);
    }

    out.drain(..delay);
    out.truncate(expected_len);
    Ok(out)
}

/// Lower the perceived pitch by resampling down by [`PITCH_SHIFT_RATIO`] and
/// back up to the original rate.
///
/// Duration is preserved within one frame of rounding error. Time-domain
/// artifacts of the round trip are accepted as-is; there is no formant
/// correction.
pub fn pitch_shift_down(samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, AudioError> {
    let lowered_rate = (sample_rate as f64 * PITCH_SHIFT_RATIO).round() as u32;
    let down = resample(samples, sample_rate, lowered_rate)?;
    resample(&down, lowered_rate, sample_rate)
}
