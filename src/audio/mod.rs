//! Audio post-processing for speaker reference generation.
//!
//! Every transform here is a pure function from waveform to waveform: WAV
//! read/write, mono downmix, sample-rate conversion, spectral shaping, and
//! peak normalization. Nothing holds state across calls.

pub mod io;
pub mod resample;
pub mod spectral;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("audio is silent (peak amplitude is zero)")]
    Silent,
    #[error("resampler error: {0}")]
    Resample(String),
}

/// Scale samples in place so the loudest one has absolute value 1.0.
///
/// Silent input (all-zero or empty) is an error: a silent waveform must never
/// be persisted as a speaker reference.
pub fn normalize(samples: &mut [f32]) -> Result<(), AudioError> {
    let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    if peak <= 0.0 {
        return Err(AudioError::Silent);
    }
    let scale = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= scale;
    }
    Ok(())
}

/// True if every sample is exactly zero (or the buffer is empty).
pub fn is_silent(samples: &[f32]) -> bool {
    samples.iter().all(|s| *s == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_peak_to_one() {
        let mut samples = vec![0.1, -0.4, 0.2];
        normalize(&mut samples).unwrap();
        let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
        // Sign and relative shape preserved
        assert!(samples[1] < 0.0);
        assert!((samples[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn normalize_rejects_silence() {
        let mut samples = vec![0.0; 128];
        assert!(matches!(normalize(&mut samples), Err(AudioError::Silent)));

        let mut empty: Vec<f32> = vec![];
        assert!(matches!(normalize(&mut empty), Err(AudioError::Silent)));
    }

    #[test]
    fn silence_detection() {
        assert!(is_silent(&[]));
        assert!(is_silent(&[0.0, 0.0]));
        assert!(!is_silent(&[0.0, 1e-9]));
    }
}
