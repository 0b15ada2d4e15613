use std::path::{Path, PathBuf};

use crate::{SynthesisEngine, SynthesisResult};

use super::model::{XttsError, XttsModel};

/// Parameters for configuring model loading.
#[derive(Debug, Clone, Default)]
pub struct XttsModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the runtime default (typically all available cores).
    pub num_threads: Option<usize>,
}

/// Parameters for configuring a synthesis request.
#[derive(Debug, Clone)]
pub struct XttsSynthesisParams {
    /// Reference clip whose timbre the cloned voice should match.
    /// Ignored by single-speaker models.
    pub speaker_wav: Option<PathBuf>,
    /// Language code, e.g. `"en"`. Must be listed in the model's config.
    pub language: String,
}

impl Default for XttsSynthesisParams {
    fn default() -> Self {
        Self {
            speaker_wav: None,
            language: "en".to_string(),
        }
    }
}

/// ONNX-backed engine for registry models.
///
/// Handles both XTTS v2 voice-cloning exports and single-speaker exports;
/// the graph family is detected when the model is loaded.
///
/// # Quick Start
///
/// ```rust,no_run
/// use voiceref::{SynthesisEngine, engines::xtts::XttsEngine};
/// use std::path::PathBuf;
///
/// let mut engine = XttsEngine::new();
/// engine.load_model(&PathBuf::from("models/tts_models--en--ljspeech--fast_pitch"))?;
/// let result = engine.synthesize("Hello, world!", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct XttsEngine {
    model: Option<XttsModel>,
    model_dir: Option<PathBuf>,
}

impl Default for XttsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XttsEngine {
    /// Create a new engine with no model loaded.
    pub fn new() -> Self {
        Self {
            model: None,
            model_dir: None,
        }
    }

    /// Output sample rate of the loaded model, if one is loaded.
    pub fn sample_rate(&self) -> Option<u32> {
        self.model.as_ref().map(|m| m.sample_rate())
    }

    /// True when the loaded model accepts speaker-reference conditioning.
    pub fn supports_voice_cloning(&self) -> bool {
        self.model
            .as_ref()
            .map(|m| m.supports_voice_cloning())
            .unwrap_or(false)
    }
}

impl Drop for XttsEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for XttsEngine {
    type SynthesisParams = XttsSynthesisParams;
    type ModelParams = XttsModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let model = XttsModel::load(model_path, params.num_threads)?;
        self.model = Some(model);
        self.model_dir = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_dir = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let model = self.model.as_mut().ok_or(XttsError::ModelNotLoaded)?;

        let p = params.unwrap_or_default();
        let samples = model.synthesize_text(text, p.speaker_wav.as_deref(), &p.language)?;
        let sample_rate = model.sample_rate();

        Ok(SynthesisResult {
            samples,
            sample_rate,
        })
    }
}
