//! Whisper-based STT engine

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::SttConfig;
use crate::error::{EngineError, Result};

/// Whisper wants at least one second of audio
const MIN_SAMPLES: usize = 16_000;

/// Transcription result
#[derive(Debug, Clone, Default)]
pub struct TranscriptionResult {
    /// Full transcript text
    pub text: String,
    /// Individual segments in emission order
    pub segments: Vec<TranscriptionSegment>,
}

/// Individual transcription segment
#[derive(Debug, Clone)]
pub struct TranscriptionSegment {
    /// Segment text as emitted by the model
    pub text: String,
    /// Start time in milliseconds
    pub start_ms: i64,
    /// End time in milliseconds
    pub end_ms: i64,
}

impl TranscriptionResult {
    /// Build a result from segments in emission order
    ///
    /// The transcript is the segment texts concatenated with no
    /// separator, then trimmed of leading and trailing whitespace.
    /// Whitespace between segments is preserved.
    pub fn from_segments(segments: Vec<TranscriptionSegment>) -> Self {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        Self {
            text: text.trim().to_string(),
            segments,
        }
    }
}

/// Whisper-based Speech-to-Text engine
pub struct SttEngine {
    ctx: WhisperContext,
    config: SttConfig,
}

impl SttEngine {
    /// Create a new STT engine with the given configuration
    ///
    /// Resolves the quantized ggml model for the configured size,
    /// downloading it into the cache directory on first use.
    pub fn new(config: SttConfig) -> Result<Self> {
        let model_path = super::model::resolve_model(&config)?;

        info!("Loading Whisper model from: {}", model_path.display());

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().unwrap_or_default(),
            ctx_params,
        )
        .map_err(|e| EngineError::ModelLoad(e.to_string()))?;

        info!("Whisper model loaded successfully");

        Ok(Self { ctx, config })
    }

    /// Transcribe audio samples
    ///
    /// Audio must be 16 kHz mono f32 samples. An empty input yields an
    /// empty result without touching the model.
    pub fn transcribe(&self, samples: &[f32]) -> Result<TranscriptionResult> {
        if samples.is_empty() {
            return Ok(TranscriptionResult::default());
        }

        // whisper.cpp rejects clips shorter than a second
        let padded;
        let samples = if samples.len() < MIN_SAMPLES {
            let mut buf = samples.to_vec();
            buf.resize(MIN_SAMPLES, 0.0);
            padded = buf;
            &padded[..]
        } else {
            samples
        };

        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / 16000.0
        );

        // Greedy with a single hypothesis is the fastest decoding mode
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        params.set_n_threads(self.threads());
        params.set_language(Some(self.config.language.as_deref().unwrap_or("auto")));
        params.set_translate(self.config.translate);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_single_segment(false);
        params.set_no_context(true);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| EngineError::Whisper(e.to_string()))?;

        state
            .full(params, samples)
            .map_err(|e| EngineError::Transcription(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| EngineError::Transcription(e.to_string()))?;

        let mut segments = Vec::with_capacity(num_segments as usize);
        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))?;

            // Timestamps come in centiseconds
            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))? as i64
                * 10;
            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))? as i64
                * 10;

            segments.push(TranscriptionSegment {
                text,
                start_ms: start,
                end_ms: end,
            });
        }

        let result = TranscriptionResult::from_segments(segments);
        debug!(
            "Transcription complete: {} segments, {} chars",
            result.segments.len(),
            result.text.len()
        );

        Ok(result)
    }

    fn threads(&self) -> i32 {
        let threads = if self.config.threads == 0 {
            num_cpus::get().min(8)
        } else {
            self.config.threads as usize
        };
        threads as i32
    }
}
