//! Audio loading and voice activity filtering

pub mod decode;
pub mod vad;

pub use decode::{load_wav, WHISPER_SAMPLE_RATE};
pub use vad::{SpeechFilter, VadResult, VoiceActivityDetector};
