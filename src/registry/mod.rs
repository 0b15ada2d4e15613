//! Model registry: download and cache pretrained TTS models by identifier.
//!
//! A [`ModelRegistry`] owns a models directory and a manifest mapping
//! identifiers like `tts_models/en/ljspeech/fast_pitch` to archive URLs.
//! Downloads are idempotent: a model already present on disk is never
//! re-fetched. The registry holds no other state, so callers create one at
//! process start and pass it into each operation.

mod manifest;

pub use manifest::ModelEntry;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown model identifier: {0}")]
    UnknownModel(String),
    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },
    #[error("bad model archive for {name}: {reason}")]
    Archive { name: String, reason: String },
    #[error("invalid model manifest: {0}")]
    Manifest(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local paths of a downloaded model.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Directory the archive was unpacked into.
    pub model_dir: PathBuf,
    /// The model's `config.json` inside that directory.
    pub config_path: PathBuf,
}

/// Downloads and caches pretrained models under a local directory.
pub struct ModelRegistry {
    models_dir: PathBuf,
    manifest: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Registry over `models_dir` using the embedded manifest.
    pub fn new(models_dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let manifest =
            manifest::builtin_manifest().map_err(|e| RegistryError::Manifest(e.to_string()))?;
        Ok(Self {
            models_dir: models_dir.into(),
            manifest,
        })
    }

    /// Registry with an explicit manifest (private mirrors, tests).
    pub fn with_manifest(models_dir: impl Into<PathBuf>, manifest: Vec<ModelEntry>) -> Self {
        Self {
            models_dir: models_dir.into(),
            manifest,
        }
    }

    /// All model identifiers known to this registry.
    pub fn list_models(&self) -> Vec<&str> {
        self.manifest.iter().map(|m| m.name.as_str()).collect()
    }

    /// Look up a manifest entry by identifier.
    pub fn entry(&self, name: &str) -> Option<&ModelEntry> {
        self.manifest.iter().find(|m| m.name == name)
    }

    /// Directory a model unpacks into: the identifier with `/` replaced by `--`.
    pub fn model_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name.replace('/', "--"))
    }

    /// True once a model's files are present locally.
    pub fn is_downloaded(&self, name: &str) -> bool {
        self.model_dir(name).join("config.json").exists()
    }

    /// Ensure the model is present locally, downloading it if absent.
    ///
    /// Idempotent: a second call observes the cached copy and performs no
    /// network I/O. A failed download leaves nothing behind.
    pub fn download(&self, name: &str) -> Result<ModelPaths, RegistryError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| RegistryError::UnknownModel(name.to_string()))?;

        let model_dir = self.model_dir(name);
        let config_path = model_dir.join("config.json");
        if config_path.exists() {
            log::info!("Model {name} already present at {}", model_dir.display());
            return Ok(ModelPaths {
                model_dir,
                config_path,
            });
        }

        fs::create_dir_all(&self.models_dir)?;
        let archive = fetch(&entry.url)?;

        if let Err(e) = unpack_archive(name, &archive, &model_dir) {
            let _ = fs::remove_dir_all(&model_dir);
            return Err(e);
        }

        if !config_path.exists() {
            let _ = fs::remove_dir_all(&model_dir);
            return Err(RegistryError::Archive {
                name: name.to_string(),
                reason: "archive did not contain config.json".to_string(),
            });
        }

        log::info!("Model {name} downloaded to {}", model_dir.display());
        Ok(ModelPaths {
            model_dir,
            config_path,
        })
    }
}

/// Download a URL into memory.
fn fetch(url: &str) -> Result<Vec<u8>, RegistryError> {
    log::info!("Downloading {url}");
    let response = ureq::get(url).call().map_err(|e| RegistryError::Download {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let mut data = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| RegistryError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(data)
}

/// Unpack a zip archive into `dir`, stripping a shared top-level folder.
fn unpack_archive(name: &str, data: &[u8], dir: &Path) -> Result<(), RegistryError> {
    let bad_archive = |reason: String| RegistryError::Archive {
        name: name.to_string(),
        reason,
    };

    let cursor = std::io::Cursor::new(data);
    let mut zip =
        zip::ZipArchive::new(cursor).map_err(|e| bad_archive(format!("not a zip file: {e}")))?;

    let root = archive_root(&zip);
    fs::create_dir_all(dir)?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| bad_archive(format!("failed to read entry {i}: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let entry_path = entry
            .enclosed_name()
            .ok_or_else(|| bad_archive(format!("unsafe path in archive: {}", entry.name())))?;

        // Archives usually wrap everything in a single folder; flatten it away.
        let rel: PathBuf = match &root {
            Some(root) => entry_path
                .strip_prefix(root)
                .unwrap_or(&entry_path)
                .to_path_buf(),
            None => entry_path,
        };
        if rel.as_os_str().is_empty() {
            continue;
        }

        let dest = dir.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&dest)?;
        std::io::copy(&mut entry, &mut file)?;
    }

    Ok(())
}

/// The single top-level directory shared by every archive entry, if any.
fn archive_root<R: std::io::Read + std::io::Seek>(zip: &zip::ZipArchive<R>) -> Option<String> {
    let mut root: Option<&str> = None;
    for entry_name in zip.file_names() {
        let (first, rest) = entry_name.split_once('/')?;
        if rest.is_empty() && !entry_name.ends_with('/') {
            return None;
        }
        match root {
            None => root = Some(first),
            Some(seen) if seen == first => {}
            Some(_) => return None,
        }
    }
    root.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn test_manifest() -> Vec<ModelEntry> {
        vec![ModelEntry {
            name: "tts_models/en/test/dummy".to_string(),
            url: "https://registry.invalid/dummy.zip".to_string(),
            default_vocoder: None,
        }]
    }

    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn model_dir_replaces_slashes() {
        let registry = ModelRegistry::with_manifest("models", test_manifest());
        assert_eq!(
            registry.model_dir("tts_models/en/test/dummy"),
            PathBuf::from("models/tts_models--en--test--dummy")
        );
    }

    #[test]
    fn unknown_model_is_an_error() {
        let registry = ModelRegistry::with_manifest("models", test_manifest());
        let err = registry.download("tts_models/xx/nope/nope").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownModel(_)));
    }

    #[test]
    fn second_download_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::with_manifest(dir.path(), test_manifest());

        // Seed the cache by hand; the manifest URL is unreachable, so any
        // network attempt would fail the call.
        let model_dir = registry.model_dir("tts_models/en/test/dummy");
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join("config.json"), b"{}").unwrap();

        let paths = registry.download("tts_models/en/test/dummy").unwrap();
        assert_eq!(paths.model_dir, model_dir);
        assert!(paths.config_path.exists());
        assert!(registry.is_downloaded("tts_models/en/test/dummy"));
    }

    #[test]
    fn unpack_strips_shared_root_folder() {
        let data = make_zip(&[
            ("bundle/config.json", b"{}".as_slice()),
            ("bundle/model.onnx", b"onnx".as_slice()),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model");

        unpack_archive("test", &data, &dest).unwrap();
        assert!(dest.join("config.json").exists());
        assert!(dest.join("model.onnx").exists());
    }

    #[test]
    fn unpack_keeps_flat_archives_flat() {
        let data = make_zip(&[("config.json", b"{}".as_slice())]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model");

        unpack_archive("test", &data, &dest).unwrap();
        assert!(dest.join("config.json").exists());
    }

    #[test]
    fn garbage_archive_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = unpack_archive("test", b"not a zip", &dir.path().join("m")).unwrap_err();
        assert!(matches!(err, RegistryError::Archive { .. }));
    }

    #[test]
    fn embedded_manifest_backs_the_default_registry() {
        let registry = ModelRegistry::new("models").unwrap();
        assert!(registry
            .list_models()
            .contains(&"tts_models/multilingual/multi-dataset/your_tts"));
    }
}
