//! Timed smoke tests for the FastPitch and YourTTS models.
//!
//! Each model is tested independently; one failure does not stop the other
//! test from running.

use std::path::Path;
use std::time::Instant;

use voiceref::engines::xtts::XttsEngine;
use voiceref::registry::ModelRegistry;
use voiceref::report::BatchReport;
use voiceref::SynthesisEngine;

const TESTS: &[(&str, &str, &str)] = &[
    (
        "tts_models/en/ljspeech/fast_pitch",
        "This is a test of the FastPitch text to speech system.",
        "server/test-output/fastpitch_test.wav",
    ),
    (
        "tts_models/multilingual/multi-dataset/your_tts",
        "This is a test of the YourTTS multilingual system.",
        "server/test-output/yourtts_test.wav",
    ),
];

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: test-all-tts");
        std::process::exit(1);
    }

    let registry = match ModelRegistry::new("models") {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all("server/test-output") {
        eprintln!("Error creating output directory: {e}");
        std::process::exit(1);
    }

    let mut report = BatchReport::new();
    for &(model, text, output) in TESTS {
        println!("\nTesting {model}...");
        match run_one(&registry, model, text, Path::new(output)) {
            Ok(elapsed) => {
                println!("✓ Test successful! Audio file created at: {output}");
                println!("  Processing time: {elapsed:.2} seconds");
                report.success(model);
            }
            Err(e) => {
                println!("✗ Error testing {model}: {e}");
                report.failure(model, e);
            }
        }
    }

    if report.all_ok() {
        println!("\nAll TTS models tested successfully!");
    } else {
        println!(
            "\nTTS testing completed with {} failure(s)",
            report.failed()
        );
    }
    std::process::exit(report.exit_code());
}

fn run_one(
    registry: &ModelRegistry,
    model: &str,
    text: &str,
    output_path: &Path,
) -> Result<f64, Box<dyn std::error::Error>> {
    let paths = registry.download(model)?;

    let mut engine = XttsEngine::new();
    engine.load_model(&paths.model_dir)?;

    let start = Instant::now();
    engine.synthesize_to_file(text, output_path, None)?;
    let elapsed = start.elapsed().as_secs_f64();

    if !output_path.exists() {
        return Err("audio file was not created".into());
    }
    Ok(elapsed)
}
