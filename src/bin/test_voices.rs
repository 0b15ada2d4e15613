//! XTTS v2 voice tests: female and male references, US and GB accent labels.
//!
//! Each combination is an independent test case; a missing reference or a
//! failed synthesis marks that case failed and the loop continues.

use std::path::{Path, PathBuf};

use voiceref::engines::xtts::{XttsEngine, XttsSynthesisParams};
use voiceref::reference::SpeakerReferenceGenerator;
use voiceref::registry::ModelRegistry;
use voiceref::report::BatchReport;
use voiceref::SynthesisEngine;

const MODEL: &str = "tts_models/multilingual/multi-dataset/xtts_v2";

/// Test text with various speech patterns.
const TEST_TEXT: &str = "Hello! Let me demonstrate the voice capabilities. \
    I'm really excited to show you this! \
    Now, let me think about something important... \
    This is how I speak softly and calmly. \
    This part is emphasized, and this part is strongly emphasized. \
    Wow! This is amazing! But let's stay focused.";

/// (speaker label, language, accent label)
const CASES: &[(&str, &str, &str)] = &[
    ("female", "en", "us"),
    ("male", "en", "us"),
    ("female", "en", "gb"),
    ("male", "en", "gb"),
];

fn main() {
    env_logger::init();

    if std::env::args().count() != 1 {
        eprintln!("Usage: test-voices");
        std::process::exit(1);
    }

    if let Err(e) = std::fs::create_dir_all("test_output") {
        eprintln!("Error creating output directory: {e}");
        std::process::exit(1);
    }

    let registry = match ModelRegistry::new("models") {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting voice tests...");

    let mut report = BatchReport::new();
    let mut engine = XttsEngine::new();
    let mut loaded = false;

    for &(speaker, language, accent) in CASES {
        let case = format!("{} {speaker} voice", accent.to_uppercase());
        match run_case(
            &registry,
            &mut engine,
            &mut loaded,
            speaker,
            language,
            accent,
        ) {
            Ok(output) => {
                println!("✓ Test successful for {case}: {}", output.display());
                report.success(case);
            }
            Err(e) => {
                println!("✗ Test failed for {case}: {e}");
                report.failure(case, e);
            }
        }
    }

    println!("\nVoice testing completed");
    println!("Test files are available in: test_output/");
    std::process::exit(report.exit_code());
}

fn run_case(
    registry: &ModelRegistry,
    engine: &mut XttsEngine,
    loaded: &mut bool,
    speaker: &str,
    language: &str,
    accent: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let speaker_wav = PathBuf::from(format!("models/speaker_references/{speaker}.wav"));
    SpeakerReferenceGenerator::ensure_reference(&speaker_wav)?;

    // Load the model once and reuse it across cases.
    if !*loaded {
        let paths = registry.download(MODEL)?;
        engine.load_model(&paths.model_dir)?;
        *loaded = true;
    }

    let output = PathBuf::from(format!("test_output/test_xtts_{speaker}_{accent}.wav"));
    println!("\nTesting XTTS v2 with {speaker} voice ({accent} accent)");
    println!("Output file: {}", output.display());
    println!("Using speaker reference: {}", speaker_wav.display());

    let params = XttsSynthesisParams {
        speaker_wav: Some(speaker_wav),
        language: language.to_string(),
    };
    engine.synthesize_to_file(TEST_TEXT, Path::new(&output), Some(params))?;
    Ok(output)
}
