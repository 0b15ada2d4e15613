//! Generate the female and male speaker reference files.
//!
//! Each voice is synthesized with its own model, post-processed, and
//! persisted under `models/speaker_references/`. One voice failing does not
//! stop the other; temp files are cleaned up either way.

use std::path::PathBuf;

use voiceref::engines::xtts::XttsEngine;
use voiceref::reference::{self, SpeakerReferenceGenerator, VoiceProfile};
use voiceref::registry::ModelRegistry;
use voiceref::report::BatchReport;
use voiceref::SynthesisEngine;

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: setup-speaker-references");
        std::process::exit(1);
    }

    let registry = match ModelRegistry::new("models") {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let generator = match SpeakerReferenceGenerator::new() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting speaker reference setup...");

    let mut report = BatchReport::new();
    for profile in reference::stock_profiles() {
        println!("\nGenerating {} reference audio...", profile.label);
        match generate_one(&registry, &generator, &profile) {
            Ok(path) => {
                println!(
                    "✓ Successfully generated {} reference audio: {}",
                    profile.label,
                    path.display()
                );
                report.success(profile.label);
            }
            Err(e) => {
                println!("✗ Error generating {} reference: {e}", profile.label);
                report.failure(profile.label, e);
            }
        }
    }

    generator.cleanup();

    if report.all_ok() {
        println!("\n✓ Speaker reference setup completed successfully");
        println!("Reference files are available in: models/speaker_references/");
    } else {
        println!("\n✗ Speaker reference setup completed with errors");
    }
    std::process::exit(report.exit_code());
}

fn generate_one(
    registry: &ModelRegistry,
    generator: &SpeakerReferenceGenerator,
    profile: &VoiceProfile,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let paths = registry.download(profile.model)?;

    println!("Loading model: {}", profile.model);
    let mut engine = XttsEngine::new();
    engine.load_model(&paths.model_dir)?;

    println!("Generating initial audio...");
    let path = generator.generate(profile, |text| engine.synthesize(text, None))?;
    Ok(path)
}
