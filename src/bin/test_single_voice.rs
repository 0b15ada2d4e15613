//! XTTS v2 test with the male speaker reference.
//!
//! Aborts before any model work if the reference file is missing.

use std::path::{Path, PathBuf};

use voiceref::engines::xtts::{XttsEngine, XttsSynthesisParams};
use voiceref::reference::SpeakerReferenceGenerator;
use voiceref::registry::ModelRegistry;
use voiceref::SynthesisEngine;

const MODEL: &str = "tts_models/multilingual/multi-dataset/xtts_v2";
const TEXT: &str = "Hello, this is a test of the James voice.";

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: test-single-voice");
        std::process::exit(1);
    }

    if let Err(e) = run() {
        println!("\n✗ Error during TTS generation: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("test_output")?;

    // The reference must exist before we spend time loading a model.
    let speaker_wav = PathBuf::from("models/speaker_references/male.wav");
    SpeakerReferenceGenerator::ensure_reference(&speaker_wav)?;

    println!("Initializing TTS with XTTS v2...");
    let registry = ModelRegistry::new("models")?;
    let paths = registry.download(MODEL)?;

    let mut engine = XttsEngine::new();
    engine.load_model(&paths.model_dir)?;

    let output_path = Path::new("test_output/test_james.wav");
    println!("\nGenerating speech...");
    println!("Text: {TEXT}");
    println!("Output: {}", output_path.display());
    println!("Speaker reference: {}", speaker_wav.display());

    let params = XttsSynthesisParams {
        speaker_wav: Some(speaker_wav),
        language: "en".to_string(),
    };
    engine.synthesize_to_file(TEXT, output_path, Some(params))?;

    let size = std::fs::metadata(output_path)?.len();
    println!(
        "\n✓ Successfully generated audio file: {}",
        output_path.display()
    );
    println!("File size: {size} bytes");
    Ok(())
}
