//! WAV reading and writing for post-processing and output verification.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::AudioError;

/// Read a WAV file into interleaved f32 samples plus its spec.
///
/// Integer PCM is scaled into [-1, 1]; float files are returned as-is.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, WavSpec), AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok((samples, spec))
}

/// Write mono samples to a 32-bit float WAV file.
pub fn write_wav_f32(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Downmix interleaved samples to mono by averaging channels.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
