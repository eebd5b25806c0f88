//! Whisper transcription CLI
//!
//! `transcriber <audio_path>` prints one line of JSON on stdout:
//! `{"text":"<transcript>"}` on success, `{"error":"no audio path given"}`
//! with exit code 1 when the path argument is missing. All other
//! failures exit nonzero with a diagnostic on stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use transcriber::{output, Config, ModelSize, SpeechFilter, SttEngine, WHISPER_SAMPLE_RATE};

/// Transcribe an audio file to JSON using Whisper
#[derive(Parser)]
#[command(name = "transcriber")]
#[command(about = "Transcribe an audio file and print the transcript as JSON", long_about = None)]
struct Cli {
    /// Path to the audio file to transcribe (WAV)
    audio: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model size (tiny, base, small, medium, large)
    #[arg(short, long)]
    model_size: Option<ModelSize>,

    /// Directory containing ggml model files
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Language code (e.g. en, de, ja); autodetect when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the JSON result
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .init();

    // The missing-path check happens before any model work
    let Some(audio_path) = cli.audio else {
        output::print_error("no audio path given")?;
        std::process::exit(1);
    };

    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    config.apply_env().context("Invalid environment override")?;

    // CLI flags override file and environment
    if let Some(model_size) = cli.model_size {
        config.stt.model_size = model_size;
    }
    if let Some(model_dir) = cli.model_dir {
        config.stt.model_dir = Some(model_dir);
    }
    if let Some(language) = cli.language {
        config.stt.language = Some(language);
    }

    let text = transcribe(&config, &audio_path)?;
    output::print_transcript(&text)?;

    Ok(())
}

/// Run the full pipeline for one audio file
fn transcribe(config: &Config, audio_path: &Path) -> Result<String> {
    info!("Transcribing: {}", audio_path.display());

    let samples = transcriber::load_wav(audio_path)
        .with_context(|| format!("Failed to load audio from {}", audio_path.display()))?;

    let mut filter = SpeechFilter::new(&config.vad, WHISPER_SAMPLE_RATE);
    let voiced = filter.filter(&samples);

    if voiced.is_empty() {
        info!("No speech detected, skipping inference");
        return Ok(String::new());
    }

    let engine = SttEngine::new(config.stt.clone()).context("Failed to initialize STT engine")?;
    let result = engine.transcribe(&voiced).context("Transcription failed")?;

    Ok(result.text)
}
