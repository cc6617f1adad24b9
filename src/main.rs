// Craftbot - seq2seq Minecraft Q&A console chatbot
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use craftbot::config::load_config;
use craftbot::console::LineConsole;
use craftbot::model::{JsonVocab, OnnxPredictor};
use craftbot::profile::ProfileStore;
use craftbot::session::Session;

#[derive(Parser, Debug)]
#[command(name = "craftbot", version, about = "Seq2seq Minecraft Q&A console chatbot")]
struct Cli {
    /// Path to the exported seq2seq model (ONNX)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to the tokenizer vocabulary (tokenizers JSON)
    #[arg(long)]
    tokenizer: Option<PathBuf>,

    /// Directory holding per-user profile files
    #[arg(long)]
    profiles_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so they never mix into the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(tokenizer) = cli.tokenizer {
        config.tokenizer_path = tokenizer;
    }
    if let Some(profiles_dir) = cli.profiles_dir {
        config.profiles_dir = profiles_dir;
    }

    let vocab = JsonVocab::from_file(&config.tokenizer_path)?;
    let mut predictor = OnnxPredictor::from_file(&config.model_path)?;
    let store = ProfileStore::new(config.profiles_dir.clone());
    let mut console = LineConsole::new()?;

    Session::new(store).run(&mut console, &mut predictor, &vocab)
}
