//! Batch-download the standard model set.
//!
//! A failed download is reported and skipped; the remaining models are still
//! fetched. The exit code reflects whether any item failed.

use voiceref::registry::ModelRegistry;
use voiceref::report::BatchReport;

/// High-quality models the server expects to have available.
const MODELS: &[&str] = &[
    "tts_models/multilingual/multi-dataset/xtts_v2",
    "tts_models/en/vctk/vits",
    "tts_models/en/ljspeech/vits",
    "vocoder_models/en/ljspeech/hifigan_v2",
];

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: download-models");
        std::process::exit(1);
    }

    let registry = match ModelRegistry::new("models") {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting model downloads...");

    let mut report = BatchReport::new();
    for &model in MODELS {
        println!("Downloading model: {model}");
        match registry.download(model) {
            Ok(paths) => {
                println!("Model {model} downloaded to {}", paths.model_dir.display());
                println!("Config saved to {}", paths.config_path.display());
                report.success(model);
            }
            Err(e) => {
                println!("Failed to download {model}: {e}");
                report.failure(model, e);
            }
        }
    }

    println!(
        "Model download process completed ({} succeeded, {} failed)",
        report.succeeded(),
        report.failed()
    );
    std::process::exit(report.exit_code());
}
