//! FastPitch smoke test: synthesize one sentence and verify the file landed.

use std::path::Path;

use voiceref::engines::xtts::XttsEngine;
use voiceref::registry::ModelRegistry;
use voiceref::SynthesisEngine;

const MODEL: &str = "tts_models/en/ljspeech/fast_pitch";
const TEXT: &str = "This is a test of the FastPitch text to speech system.";

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: test-fastpitch");
        std::process::exit(1);
    }

    if let Err(e) = run() {
        println!("Error during TTS test: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("server/test-output")?;

    println!("Initializing TTS with FastPitch...");
    let registry = ModelRegistry::new("models")?;
    let paths = registry.download(MODEL)?;

    let mut engine = XttsEngine::new();
    engine.load_model(&paths.model_dir)?;

    let output_path = Path::new("server/test-output/test.wav");
    engine.synthesize_to_file(TEXT, output_path, None)?;

    if output_path.exists() {
        println!(
            "Test successful! Audio file created at: {}",
            output_path.display()
        );
        Ok(())
    } else {
        Err("audio file was not created".into())
    }
}
