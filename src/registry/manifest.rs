//! The embedded model manifest, mapping model identifiers to release archives.

use serde::Deserialize;

/// One downloadable model in the registry manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    /// Registry identifier, e.g. `tts_models/en/ljspeech/fast_pitch`.
    pub name: String,
    /// URL of the zip archive holding the model files.
    pub url: String,
    /// Preferred vocoder for models that need a separate one.
    #[serde(default)]
    pub default_vocoder: Option<String>,
}

const MANIFEST_JSON: &str = include_str!("models.json");

/// Parse the manifest compiled into the binary.
pub fn builtin_manifest() -> Result<Vec<ModelEntry>, serde_json::Error> {
    serde_json::from_str(MANIFEST_JSON)
}

#[cfg(test)]
mod tests {
    use super::builtin_manifest;

    #[test]
    fn embedded_manifest_parses() {
        let manifest = builtin_manifest().unwrap();
        assert!(manifest.len() >= 4);

        let fast_pitch = manifest
            .iter()
            .find(|m| m.name == "tts_models/en/ljspeech/fast_pitch")
            .unwrap();
        assert_eq!(
            fast_pitch.default_vocoder.as_deref(),
            Some("vocoder_models/en/ljspeech/hifigan_v2")
        );
        assert!(fast_pitch.url.ends_with(".zip"));

        assert!(manifest
            .iter()
            .any(|m| m.name == "tts_models/multilingual/multi-dataset/xtts_v2"));
    }
}
