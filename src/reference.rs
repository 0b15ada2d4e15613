//! Speaker-reference generation for voice-cloning synthesis.
//!
//! A speaker reference is a short clip capturing a voice's timbre, consumed
//! later as conditioning input by a cloning model. The pipeline synthesizes a
//! scripted take, re-reads it, downmixes, resamples to the canonical rate,
//! applies voice-specific spectral shaping, normalizes, and persists the
//! result as `{label}.wav` — verifying after the write that the file is not
//! silent. Temp files are removed on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::{self, io, resample, spectral};
use crate::SynthesisResult;

/// Canonical sample rate for speaker reference files.
pub const REFERENCE_SAMPLE_RATE: u32 = 22050;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error(transparent)]
    Audio(#[from] audio::AudioError),
    #[error("generated audio file appears to be silent")]
    SilentOutput,
    #[error("speaker reference not found at {0}")]
    MissingReference(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to synthesize for one reference voice and how to shape it.
#[derive(Debug, Clone)]
pub struct VoiceProfile {
    /// File label, e.g. `"male"` or `"female"`.
    pub label: &'static str,
    /// Registry identifier of the model used for the initial take.
    pub model: &'static str,
    /// Script read by the voice.
    pub text: &'static str,
    /// Apply pitch lowering and bass boost after synthesis.
    pub deepen: bool,
}

/// The two stock reference voices.
pub fn stock_profiles() -> [VoiceProfile; 2] {
    [
        VoiceProfile {
            label: "female",
            model: "tts_models/en/ljspeech/tacotron2-DDC",
            text: "Hello, I am a female voice assistant. I aim to provide clear and \
                   natural speech with proper intonation and emphasis. My voice is \
                   designed to be pleasant and professional.",
            deepen: false,
        },
        VoiceProfile {
            label: "male",
            model: "tts_models/en/ljspeech/fast_pitch",
            text: "Hello, I am a male voice assistant. I aim to provide clear and \
                   natural speech with proper intonation and emphasis. My voice is \
                   designed to be deep and professional.",
            deepen: true,
        },
    ]
}

/// Removes the wrapped file when dropped, on every exit path.
struct TempWav(PathBuf);

impl TempWav {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        if self.0.exists() {
            if let Err(e) = fs::remove_file(&self.0) {
                log::warn!("Failed to remove temp file {}: {e}", self.0.display());
            }
        }
    }
}

/// Generates speaker reference files under a fixed directory layout.
pub struct SpeakerReferenceGenerator {
    ref_dir: PathBuf,
    temp_dir: PathBuf,
}

impl SpeakerReferenceGenerator {
    /// Default layout: `models/speaker_references/` and `models/temp/`.
    pub fn new() -> Result<Self, ReferenceError> {
        Self::with_dirs("models/speaker_references", "models/temp")
    }

    /// Generator with explicit reference and temp directories.
    pub fn with_dirs(
        ref_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Result<Self, ReferenceError> {
        let ref_dir = ref_dir.into();
        let temp_dir = temp_dir.into();
        fs::create_dir_all(&ref_dir)?;
        fs::create_dir_all(&temp_dir)?;
        Ok(Self { ref_dir, temp_dir })
    }

    /// Where the reference for a voice label is persisted.
    pub fn reference_path(&self, label: &str) -> PathBuf {
        self.ref_dir.join(format!("{label}.wav"))
    }

    /// Check that a reference file exists before synthesis is attempted.
    pub fn ensure_reference(path: &Path) -> Result<(), ReferenceError> {
        if path.exists() {
            Ok(())
        } else {
            Err(ReferenceError::MissingReference(path.to_path_buf()))
        }
    }

    /// Generate one reference voice and return the persisted path.
    ///
    /// `synthesize` maps the profile's script to raw audio: a loaded TTS
    /// engine in production, a stub in tests. On any failure the partial
    /// output file is deleted; the temp take is deleted regardless.
    pub fn generate<F>(
        &self,
        profile: &VoiceProfile,
        synthesize: F,
    ) -> Result<PathBuf, ReferenceError>
    where
        F: FnOnce(&str) -> Result<SynthesisResult, Box<dyn std::error::Error>>,
    {
        let output_path = self.reference_path(profile.label);
        let temp = TempWav(self.temp_dir.join(format!("{}_temp.wav", profile.label)));

        let result = self.generate_inner(profile, &output_path, temp.path(), synthesize);
        if result.is_err() && output_path.exists() {
            let _ = fs::remove_file(&output_path);
        }
        result.map(|()| output_path)
    }

    fn generate_inner<F>(
        &self,
        profile: &VoiceProfile,
        output_path: &Path,
        temp_path: &Path,
        synthesize: F,
    ) -> Result<(), ReferenceError>
    where
        F: FnOnce(&str) -> Result<SynthesisResult, Box<dyn std::error::Error>>,
    {
        log::info!(
            "Generating {} reference audio with {}",
            profile.label,
            profile.model
        );
        let take =
            synthesize(profile.text).map_err(|e| ReferenceError::Synthesis(e.to_string()))?;
        take.write_wav(temp_path)?;

        // Re-read the take and shape it.
        let (samples, spec) = io::read_wav(temp_path)?;
        let mut mono = io::downmix_mono(&samples, spec.channels);
        if spec.sample_rate != REFERENCE_SAMPLE_RATE {
            mono = resample::resample(&mono, spec.sample_rate, REFERENCE_SAMPLE_RATE)?;
        }

        if profile.deepen {
            log::info!("Applying voice deepening for {}", profile.label);
            mono = resample::pitch_shift_down(&mono, REFERENCE_SAMPLE_RATE)?;
            mono = spectral::bass_boost(&mono, REFERENCE_SAMPLE_RATE);
        }
        mono = spectral::clarity_boost(&mono, REFERENCE_SAMPLE_RATE);
        audio::normalize(&mut mono)?;

        io::write_wav_f32(output_path, &mono, REFERENCE_SAMPLE_RATE)?;

        // Verify what actually landed on disk.
        let (written, _) = io::read_wav(output_path)?;
        if audio::is_silent(&written) {
            return Err(ReferenceError::SilentOutput);
        }

        log::info!(
            "Wrote {} reference to {}",
            profile.label,
            output_path.display()
        );
        Ok(())
    }

    /// Remove the temp directory and anything left in it.
    pub fn cleanup(&self) {
        if self.temp_dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.temp_dir) {
                log::warn!(
                    "Error cleaning up temp directory {}: {e}",
                    self.temp_dir.display()
                );
            }
        }
    }
}
