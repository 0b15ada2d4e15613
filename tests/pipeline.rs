//! End-to-end checks for the speaker-reference pipeline and batch downloads,
//! driven by stub synthesis closures so no model or network is needed.

use std::fs;
use std::path::Path;

use voiceref::audio;
use voiceref::reference::{SpeakerReferenceGenerator, VoiceProfile, REFERENCE_SAMPLE_RATE};
use voiceref::registry::{ModelEntry, ModelRegistry};
use voiceref::report::BatchReport;
use voiceref::SynthesisResult;

fn spoken_take(duration_secs: f32, sample_rate: u32) -> SynthesisResult {
    // A few mixed tones stand in for speech.
    let len = (duration_secs * sample_rate as f32) as usize;
    let samples = (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let fundamental = (2.0 * std::f32::consts::PI * 180.0 * t).sin() * 0.4;
            let overtone = (2.0 * std::f32::consts::PI * 1200.0 * t).sin() * 0.1;
            fundamental + overtone
        })
        .collect();
    SynthesisResult {
        samples,
        sample_rate,
    }
}

fn profiles_by_label() -> (VoiceProfile, VoiceProfile) {
    let [female, male] = voiceref::reference::stock_profiles();
    (female, male)
}

#[test]
fn reference_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let generator = SpeakerReferenceGenerator::with_dirs(
        dir.path().join("speaker_references"),
        dir.path().join("temp"),
    )
    .unwrap();
    let (female, male) = profiles_by_label();

    for profile in [&female, &male] {
        // Models synthesize at 24 kHz here; the pipeline resamples to canonical.
        let path = generator
            .generate(profile, |_| Ok(spoken_take(2.0, 24000)))
            .unwrap();

        assert!(path.exists(), "{} reference missing", profile.label);
        let (written, spec) = voiceref::audio::io::read_wav(&path).unwrap();
        assert_eq!(spec.sample_rate, REFERENCE_SAMPLE_RATE);
        assert!(!written.is_empty());
        assert!(!audio::is_silent(&written));

        let peak = written.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-5, "peak was {peak}");
    }

    // Nothing left behind in the temp dir.
    let leftovers: Vec<_> = fs::read_dir(dir.path().join("temp")).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn silent_take_produces_no_reference_file() {
    let dir = tempfile::tempdir().unwrap();
    let generator = SpeakerReferenceGenerator::with_dirs(
        dir.path().join("speaker_references"),
        dir.path().join("temp"),
    )
    .unwrap();
    let (female, _) = profiles_by_label();

    let result = generator.generate(&female, |_| {
        Ok(SynthesisResult {
            samples: vec![0.0; 22050],
            sample_rate: 22050,
        })
    });

    assert!(result.is_err());
    assert!(!generator.reference_path("female").exists());
}

#[test]
fn panicking_synthesis_leaves_no_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let generator = SpeakerReferenceGenerator::with_dirs(
        dir.path().join("speaker_references"),
        dir.path().join("temp"),
    )
    .unwrap();
    let (female, _) = profiles_by_label();

    let outcome =
        std::panic::catch_unwind(|| generator.generate(&female, |_| panic!("engine crashed")));

    assert!(outcome.is_err());
    assert!(!generator.reference_path("female").exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path().join("temp")).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn missing_reference_aborts_before_synthesis() {
    let missing = Path::new("/nonexistent/speaker_references/male.wav");
    let err = SpeakerReferenceGenerator::ensure_reference(missing).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn batch_with_one_invalid_model_reports_one_failure() {
    let dir = tempfile::tempdir().unwrap();

    // Three known models, seeded as already downloaded; the fourth identifier
    // is absent from the manifest entirely.
    let manifest: Vec<ModelEntry> = ["a/b/one", "a/b/two", "a/b/three"]
        .iter()
        .map(|name| ModelEntry {
            name: name.to_string(),
            url: "https://registry.invalid/archive.zip".to_string(),
            default_vocoder: None,
        })
        .collect();
    let registry = ModelRegistry::with_manifest(dir.path(), manifest);

    for name in ["a/b/one", "a/b/two", "a/b/three"] {
        let model_dir = registry.model_dir(name);
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join("config.json"), b"{}").unwrap();
    }

    let mut report = BatchReport::new();
    for name in ["a/b/one", "a/b/two", "a/b/bogus", "a/b/three"] {
        match registry.download(name) {
            Ok(_) => report.success(name),
            Err(e) => report.failure(name, e),
        }
    }

    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 1);
    assert!(!report.all_ok());
    assert_eq!(report.exit_code(), 1);
    // The failing item is the bogus identifier, and the batch kept going
    // past it.
    assert_eq!(report.items()[2].label, "a/b/bogus");
    assert!(report.items()[3].ok());
}

#[test]
fn fetcher_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = vec![ModelEntry {
        name: "tts_models/en/test/cached".to_string(),
        url: "https://registry.invalid/archive.zip".to_string(),
        default_vocoder: None,
    }];
    let registry = ModelRegistry::with_manifest(dir.path(), manifest);

    let model_dir = registry.model_dir("tts_models/en/test/cached");
    fs::create_dir_all(&model_dir).unwrap();
    fs::write(model_dir.join("config.json"), b"{}").unwrap();

    // Both calls succeed without touching the unreachable URL.
    let first = registry.download("tts_models/en/test/cached").unwrap();
    let second = registry.download("tts_models/en/test/cached").unwrap();
    assert_eq!(first.model_dir, second.model_dir);
    assert_eq!(first.config_path, second.config_path);
}
