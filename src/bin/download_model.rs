//! Download the YourTTS voice-cloning model into a given directory.

use voiceref::registry::ModelRegistry;

const MODEL: &str = "tts_models/multilingual/multi-dataset/your_tts";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: download-model <output_path>");
        std::process::exit(1);
    }

    let registry = match ModelRegistry::new(&args[1]) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Downloading model: {MODEL}");
    match registry.download(MODEL) {
        Ok(paths) => {
            println!("Successfully downloaded {MODEL}");
            println!("Model saved to {}", paths.model_dir.display());
        }
        Err(e) => {
            println!("Error downloading {MODEL}: {e}");
            std::process::exit(1);
        }
    }
}
