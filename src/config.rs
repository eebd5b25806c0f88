//! Configuration structures for the transcriber

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable selecting the Whisper model size
pub const MODEL_SIZE_ENV: &str = "WHISPER_MODEL_SIZE";

/// Environment variable overriding the model directory
pub const MODEL_DIR_ENV: &str = "WHISPER_MODEL_DIR";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stt: SttConfig,
    pub vad: VadConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides
    ///
    /// `WHISPER_MODEL_SIZE` selects the model variant, `WHISPER_MODEL_DIR`
    /// points at a directory of ggml model files.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(MODEL_SIZE_ENV) {
            self.stt.model_size = value.parse()?;
        }
        if let Ok(value) = std::env::var(MODEL_DIR_ENV) {
            self.stt.model_dir = Some(PathBuf::from(value));
        }
        Ok(())
    }
}

/// STT engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Model size identifier
    pub model_size: ModelSize,
    /// Direct path to a ggml model file (takes precedence over size lookup)
    pub model_path: Option<PathBuf>,
    /// Directory to search for ggml model files (None = user cache dir)
    pub model_dir: Option<PathBuf>,
    /// Language for transcription (None = autodetect)
    pub language: Option<String>,
    /// Number of threads for inference (0 = derive from CPU count)
    pub threads: u32,
    /// Enable translation to English
    pub translate: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_size: ModelSize::Tiny,
            model_path: None,
            model_dir: None,
            language: None,
            threads: 0,
            translate: false,
        }
    }
}

/// Whisper model sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    #[default]
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// File name of the 8-bit quantized ggml model for this size
    ///
    /// Quantized weights keep CPU inference fast without a dedicated
    /// accelerator.
    pub fn file_name(&self) -> String {
        format!("ggml-{}-q8_0.bin", self.remote_name())
    }

    /// Model name as published on the whisper.cpp model repository
    fn remote_name(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large-v3",
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSize::Tiny => write!(f, "tiny"),
            ModelSize::Base => write!(f, "base"),
            ModelSize::Small => write!(f, "small"),
            ModelSize::Medium => write!(f, "medium"),
            ModelSize::Large => write!(f, "large"),
        }
    }
}

impl FromStr for ModelSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            _ => Err(ConfigError::InvalidValue {
                field: "model_size".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Voice activity filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfig {
    /// VAD energy threshold (0.0 - 1.0)
    pub threshold: f32,
    /// Minimum speech duration (seconds)
    pub min_speech_duration: f32,
    /// Minimum silence duration (seconds)
    pub min_silence_duration: f32,
    /// Audio to keep before detected speech onset (seconds)
    pub pre_roll: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            min_speech_duration: 0.25,
            min_silence_duration: 0.5,
            pre_roll: 0.2,
        }
    }
}
