//! STFT-based spectral shaping.
//!
//! Both filters follow the same path: Hann-windowed FFT frames, a fixed
//! per-bin gain curve, inverse FFT, overlap-add reconstruction. The gain
//! curves are configuration constants with no documented derivation; they are
//! preserved exactly as tuned.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use std::f32::consts::PI;

/// FFT size for analysis and synthesis frames.
pub const N_FFT: usize = 2048;

/// Hop between successive frames.
pub const HOP: usize = 512;

/// Knee of the bass-boost curve, in Hz.
pub const BASS_CUTOFF_HZ: f32 = 150.0;

/// Peak gain of the bass-boost curve (at 0 Hz).
pub const BASS_GAIN: f32 = 1.5;

/// Slope of the clarity-boost curve, relative to a quarter of the sample rate.
pub const CLARITY_SLOPE: f32 = 0.2;

/// Emphasize low frequencies to deepen a voice.
///
/// Gain per bin: `1.5 / (1 + (f / 150)^2)` — a strong boost below 150 Hz
/// rolling off above it.
pub fn bass_boost(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    apply_gain_curve(samples, sample_rate, |freq| {
        BASS_GAIN / (1.0 + (freq / BASS_CUTOFF_HZ).powi(2))
    })
}

/// Gentle high-frequency boost for clarity.
///
/// Gain per bin: `1 + 0.2 * (f / (sample_rate / 4))`, rising linearly with
/// frequency.
pub fn clarity_boost(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let quarter_rate = sample_rate as f32 / 4.0;
    apply_gain_curve(samples, sample_rate, |freq| {
        1.0 + CLARITY_SLOPE * (freq / quarter_rate)
    })
}

fn hann(i: usize, n: usize) -> f32 {
    0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos())
}

/// Filter `samples` through STFT, a per-bin gain, and inverse STFT.
///
/// The gain is applied symmetrically to conjugate bins so the reconstructed
/// signal stays real. Output length equals input length.
fn apply_gain_curve(
    samples: &[f32],
    sample_rate: u32,
    gain: impl Fn(f32) -> f32,
) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(N_FFT);
    let ifft = planner.plan_fft_inverse(N_FFT);

    let bin_hz = sample_rate as f32 / N_FFT as f32;
    let gains: Vec<f32> = (0..=N_FFT / 2).map(|k| gain(k as f32 * bin_hz)).collect();
    let window: Vec<f32> = (0..N_FFT).map(|i| hann(i, N_FFT)).collect();

    let out_len = samples.len();
    let n_frames = out_len.div_ceil(HOP);
    let mut out = vec![0.0f32; out_len];
    let mut window_sum = vec![0.0f32; out_len];

    let mut frame = vec![Complex::new(0.0f32, 0.0); N_FFT];
    for frame_idx in 0..n_frames {
        let start = frame_idx * HOP;

        for (i, slot) in frame.iter_mut().enumerate() {
            let sample = samples.get(start + i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * window[i], 0.0);
        }
        fft.process(&mut frame);

        for (k, &g) in gains.iter().enumerate() {
            frame[k] *= g;
            if k != 0 && k != N_FFT / 2 {
                frame[N_FFT - k] *= g;
            }
        }
        ifft.process(&mut frame);

        // Overlap-add with the synthesis window; normalized per sample below.
        for i in 0..N_FFT {
            let idx = start + i;
            if idx >= out_len {
                break;
            }
            let sample = frame[i].re / N_FFT as f32;
            out[idx] += sample * window[i];
            window_sum[idx] += window[i] * window[i];
        }
    }

    for (sample, &norm) in out.iter_mut().zip(&window_sum) {
        if norm > 1e-8 {
            *sample /= norm;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize, freq: f32, rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / rate as f32).sin() * 0.5)
            .collect()
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn unit_gain_reconstructs_input() {
        let samples = sine(4 * N_FFT, 440.0, 22050);
        let out = apply_gain_curve(&samples, 22050, |_| 1.0);
        assert_eq!(out.len(), samples.len());
        // Compare away from the edges, where the window sum is full.
        for i in N_FFT..(samples.len() - N_FFT) {
            assert!(
                (out[i] - samples[i]).abs() < 1e-3,
                "sample {i}: {} vs {}",
                out[i],
                samples[i]
            );
        }
    }

    #[test]
    fn bass_boost_attenuates_high_frequencies() {
        let rate = 22050;
        let low = sine(4 * N_FFT, 100.0, rate);
        let high = sine(4 * N_FFT, 4000.0, rate);

        let low_out = bass_boost(&low, rate);
        let high_out = bass_boost(&high, rate);

        // Low content is boosted toward 1.5x; high content falls well below unity.
        assert!(peak(&low_out) > peak(&low));
        assert!(peak(&high_out) < 0.2 * peak(&high));
    }

    #[test]
    fn clarity_boost_raises_high_frequencies() {
        let rate = 22050;
        let high = sine(4 * N_FFT, 5000.0, rate);
        let out = clarity_boost(&high, rate);
        assert!(peak(&out) > peak(&high));
    }

    #[test]
    fn output_length_matches_input() {
        for len in [1, 100, HOP, N_FFT, N_FFT + 7] {
            let samples = sine(len, 440.0, 22050);
            assert_eq!(bass_boost(&samples, 22050).len(), len);
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(bass_boost(&[], 22050).is_empty());
    }
}
