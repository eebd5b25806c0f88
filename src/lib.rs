//! Whisper transcription library
//!
//! Turns an audio file into a transcript using a quantized Whisper
//! model running on the CPU. The pipeline is strictly linear: decode
//! WAV, filter out silence, run inference, join the segment texts.
//!
//! # Modules
//!
//! - `audio`: WAV decoding, resampling, and voice activity filtering
//! - `stt`: Whisper engine and model file management
//! - `output`: single-line JSON formatting
//! - `config`: configuration structures
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use transcriber::{Config, SpeechFilter, SttEngine, WHISPER_SAMPLE_RATE};
//!
//! # fn main() -> transcriber::Result<()> {
//! let config = Config::default();
//!
//! let samples = transcriber::load_wav("speech.wav".as_ref())?;
//! let voiced = SpeechFilter::new(&config.vad, WHISPER_SAMPLE_RATE).filter(&samples);
//!
//! let engine = SttEngine::new(config.stt)?;
//! let result = engine.transcribe(&voiced)?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod output;
pub mod stt;

// Re-exports for convenience
pub use audio::{load_wav, SpeechFilter, VoiceActivityDetector, WHISPER_SAMPLE_RATE};
pub use config::{Config, ModelSize, SttConfig, VadConfig};
pub use error::{AudioError, ConfigError, EngineError, Result, TranscribeError};
pub use stt::{SttEngine, TranscriptionResult, TranscriptionSegment};
