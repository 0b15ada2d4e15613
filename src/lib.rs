//! # voiceref
//!
//! Model download, synthesis testing, and speaker-reference generation for
//! voice-cloning text-to-speech.
//!
//! ## Features
//!
//! - **Model registry**: download and cache pretrained TTS models by identifier
//! - **Audio post-processing**: resampling, spectral shaping, normalization
//! - **Speaker references**: generate conditioned voice samples for cloning
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! voiceref = { version = "0.3", features = ["xtts"] }
//! ```
//!
//! ```ignore
//! use std::path::PathBuf;
//! use voiceref::{engines::xtts::XttsEngine, registry::ModelRegistry, SynthesisEngine};
//!
//! let registry = ModelRegistry::new("models")?;
//! let paths = registry.download("tts_models/en/ljspeech/fast_pitch")?;
//!
//! let mut engine = XttsEngine::new();
//! engine.load_model(&paths.model_dir)?;
//! engine.synthesize_to_file("Hello, world!", &PathBuf::from("output.wav"), None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod engines;
pub mod reference;
pub mod registry;
pub mod report;

use std::path::Path;

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains raw f32 audio samples and the sample rate of the output audio.
#[derive(Debug)]
pub struct SynthesisResult {
    /// Raw mono audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio in Hz
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), audio::AudioError> {
        audio::io::write_wav_f32(path, &self.samples, self.sample_rate)
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// This trait defines the standard operations that all synthesis engines must support.
/// Each engine may have different parameter types for model loading and inference
/// configuration (voice-cloning engines take a speaker reference, single-speaker
/// engines take nothing).
pub trait SynthesisEngine {
    /// Parameters for configuring a synthesis request (speaker reference, language, etc.)
    type SynthesisParams;
    /// Parameters for configuring model loading (threads, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given text.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.synthesize(text, params)?.write_wav(wav_path)?)
    }
}
