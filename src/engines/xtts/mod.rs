//! ONNX-backed synthesis engine for registry models.
//!
//! One engine covers two model families downloaded through the registry:
//!
//! - **XTTS v2** voice-cloning exports, conditioned on a speaker reference
//!   waveform and a language id
//! - **Single-speaker** exports (FastPitch, Tacotron2, VITS over LJSpeech),
//!   which take text tokens only
//!
//! The family is detected from the session's input names at load time, so
//! callers never need to say which kind of graph they loaded.
//!
//! # Model Directory Layout
//!
//! ```text
//! models/tts_models--en--ljspeech--fast_pitch/
//! ├── model.onnx       # the exported graph
//! └── config.json      # character set, languages, audio.sample_rate
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use voiceref::{SynthesisEngine, engines::xtts::{XttsEngine, XttsSynthesisParams}};
//! use std::path::PathBuf;
//!
//! let mut engine = XttsEngine::new();
//! engine.load_model(&PathBuf::from("models/tts_models--multilingual--multi-dataset--xtts_v2"))?;
//!
//! let params = XttsSynthesisParams {
//!     speaker_wav: Some(PathBuf::from("models/speaker_references/male.wav")),
//!     language: "en".to_string(),
//! };
//! engine.synthesize_to_file("Hello!", &PathBuf::from("out.wav"), Some(params))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod model;
pub mod vocab;

pub use engine::{XttsEngine, XttsModelParams, XttsSynthesisParams};
pub use model::XttsError;
