//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `xtts` - ONNX exports of registry models (XTTS v2 voice cloning and
//!   single-speaker LJSpeech models)

#[cfg(feature = "xtts")]
pub mod xtts;
