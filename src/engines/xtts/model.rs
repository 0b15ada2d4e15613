use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use crate::audio::{io, resample};

use super::vocab;

/// Output sample rate assumed when config.json does not say otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Longest speaker-reference excerpt fed to a cloning model, in seconds.
const MAX_REFERENCE_SECS: usize = 6;

#[derive(thiserror::Error, Debug)]
pub enum XttsError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Invalid config.json: {0}")]
    Config(String),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("Speaker reference not found at {0}")]
    ReferenceNotFound(PathBuf),
    #[error("Failed to read speaker reference: {0}")]
    ReferenceUnreadable(String),
    #[error("Language '{0}' is not supported by this model")]
    UnsupportedLanguage(String),
}

/// Internal ONNX model state for one loaded registry model.
pub struct XttsModel {
    session: Session,
    vocab: HashMap<char, i64>,
    languages: Vec<String>,
    sample_rate: u32,
    /// Detected token input name: "tokens" or "input_ids"
    tokens_input_name: String,
    /// True when the graph takes `speaker_ref` / `lang_id` conditioning inputs
    voice_cloning: bool,
}

impl XttsModel {
    /// Load a model directory produced by the registry.
    ///
    /// The directory must contain an `.onnx` export (preferably `model.onnx`)
    /// and usually a `config.json` with the character set, language list, and
    /// output sample rate.
    pub fn load(model_dir: &Path, num_threads: Option<usize>) -> Result<Self, XttsError> {
        let onnx_path = find_onnx_file(model_dir)?;
        log::info!("Loading ONNX model from {}", onnx_path.display());

        let session = init_session(&onnx_path, num_threads)?;

        // Detect the graph family at load time
        let tokens_input_name = detect_tokens_input(&session);
        let voice_cloning = has_input(&session, "speaker_ref");
        log::info!(
            "Detected: tokens_input='{tokens_input_name}', voice_cloning={voice_cloning}"
        );

        let config_path = model_dir.join("config.json");
        let (vocab, languages, sample_rate) = if config_path.exists() {
            parse_config(&config_path)?
        } else {
            log::warn!("config.json not found, using default character set");
            (
                vocab::default_vocab(),
                vec!["en".to_string()],
                DEFAULT_SAMPLE_RATE,
            )
        };

        Ok(Self {
            session,
            vocab,
            languages,
            sample_rate,
            tokens_input_name,
            voice_cloning,
        })
    }

    /// Output sample rate of the loaded model.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// True when the loaded graph accepts speaker-reference conditioning.
    pub fn supports_voice_cloning(&self) -> bool {
        self.voice_cloning
    }

    /// Synthesize audio from text.
    ///
    /// `speaker_wav` and `language` condition voice-cloning graphs and are
    /// ignored by single-speaker graphs.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        speaker_wav: Option<&Path>,
        language: &str,
    ) -> Result<Vec<f32>, XttsError> {
        let tokens = vocab::tokenize(text, &self.vocab);
        if tokens.is_empty() {
            log::warn!("No tokens produced for text: {text:?}");
            return Ok(vec![]);
        }

        if self.voice_cloning {
            let reference = self.load_reference(speaker_wav)?;
            let lang_id = self.language_id(language)?;
            self.run_cloning(&tokens, &reference, lang_id)
        } else {
            self.run_single_speaker(&tokens)
        }
    }

    fn language_id(&self, language: &str) -> Result<i64, XttsError> {
        self.languages
            .iter()
            .position(|l| l == language)
            .map(|i| i as i64)
            .ok_or_else(|| XttsError::UnsupportedLanguage(language.to_string()))
    }

    /// Read, downmix, and resample the reference clip to the model rate.
    fn load_reference(&self, speaker_wav: Option<&Path>) -> Result<Vec<f32>, XttsError> {
        let path = speaker_wav
            .ok_or_else(|| XttsError::ReferenceNotFound(PathBuf::from("<not provided>")))?;
        if !path.exists() {
            return Err(XttsError::ReferenceNotFound(path.to_path_buf()));
        }

        let (samples, spec) =
            io::read_wav(path).map_err(|e| XttsError::ReferenceUnreadable(e.to_string()))?;
        let mono = io::downmix_mono(&samples, spec.channels);
        let mut reference = if spec.sample_rate != self.sample_rate {
            resample::resample(&mono, spec.sample_rate, self.sample_rate)
                .map_err(|e| XttsError::ReferenceUnreadable(e.to_string()))?
        } else {
            mono
        };

        reference.truncate(self.sample_rate as usize * MAX_REFERENCE_SECS);
        Ok(reference)
    }

    fn run_cloning(
        &mut self,
        tokens: &[i64],
        reference: &[f32],
        lang_id: i64,
    ) -> Result<Vec<f32>, XttsError> {
        let tokens_arr = Array2::from_shape_vec((1, tokens.len()), tokens.to_vec())?;
        let reference_arr = Array2::from_shape_vec((1, reference.len()), reference.to_vec())?;
        let lang_arr = ndarray::arr1(&[lang_id]);

        let inputs = inputs![
            self.tokens_input_name.as_str() => TensorRef::from_array_view(tokens_arr.view())?,
            "speaker_ref" => TensorRef::from_array_view(reference_arr.view())?,
            "lang_id" => TensorRef::from_array_view(lang_arr.view())?,
        ];
        let output = self.session.run(inputs)?;

        extract_waveform(&output)
    }

    fn run_single_speaker(&mut self, tokens: &[i64]) -> Result<Vec<f32>, XttsError> {
        let tokens_arr = Array2::from_shape_vec((1, tokens.len()), tokens.to_vec())?;

        let inputs = inputs![
            self.tokens_input_name.as_str() => TensorRef::from_array_view(tokens_arr.view())?,
        ];
        let output = self.session.run(inputs)?;

        extract_waveform(&output)
    }
}

/// Extract the first output tensor as a waveform.
fn extract_waveform(output: &ort::session::SessionOutputs) -> Result<Vec<f32>, XttsError> {
    let first_output = output
        .iter()
        .next()
        .ok_or_else(|| XttsError::Ort(ort::Error::new("No output from model")))?;
    let waveform = first_output.1.try_extract_array::<f32>()?;
    Ok(waveform.as_slice().unwrap_or(&[]).to_vec())
}

/// Find the ONNX model file in the given directory.
///
/// Prefers `model.onnx`, then falls back to the first `.onnx` file found.
fn find_onnx_file(model_dir: &Path) -> Result<PathBuf, XttsError> {
    let preferred = model_dir.join("model.onnx");
    if preferred.exists() {
        return Ok(preferred);
    }

    for entry in std::fs::read_dir(model_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("onnx") {
            log::info!("Using ONNX file: {}", path.display());
            return Ok(path);
        }
    }

    Err(XttsError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No .onnx file found in {}", model_dir.display()),
    )))
}

/// Initialize an ONNX session on the CPU execution provider.
fn init_session(onnx_path: &Path, num_threads: Option<usize>) -> Result<Session, XttsError> {
    let providers = vec![CPUExecutionProvider::default().build()];

    let mut builder = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_execution_providers(providers)?
        .with_parallel_execution(true)?;

    if let Some(threads) = num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(onnx_path)?)
}

/// Detect the token input name ("tokens" or "input_ids") from session inputs.
fn detect_tokens_input(session: &Session) -> String {
    for input in session.inputs() {
        if input.name() == "tokens" || input.name() == "input_ids" {
            return input.name().to_string();
        }
    }
    "tokens".to_string()
}

/// True if the session has an input with the given name.
fn has_input(session: &Session, name: &str) -> bool {
    session.inputs().iter().any(|input| input.name() == name)
}

/// Read character set, language list, and sample rate from config.json.
fn parse_config(
    config_path: &Path,
) -> Result<(HashMap<char, i64>, Vec<String>, u32), XttsError> {
    let content = std::fs::read_to_string(config_path)?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| XttsError::Config(format!("failed to parse JSON: {e}")))?;

    let vocab = if json.get("characters").is_some() {
        vocab::from_json(&json)?
    } else {
        log::warn!("config.json has no character set, using default");
        vocab::default_vocab()
    };

    let languages = json
        .get("languages")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| vec!["en".to_string()]);

    let sample_rate = json
        .get("audio")
        .and_then(|a| a.get("sample_rate"))
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(DEFAULT_SAMPLE_RATE);

    Ok((vocab, languages, sample_rate))
}
