//! Voice activity filtering

use tracing::trace;

use crate::config::VadConfig;

/// Result of voice activity detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadResult {
    /// Speech detected
    Speech,
    /// Silence/noise detected
    Silence,
}

/// Voice Activity Detector using energy-based thresholding
pub struct VoiceActivityDetector {
    /// Energy threshold for speech detection
    threshold: f32,
    /// Minimum speech duration in samples
    min_speech_samples: usize,
    /// Minimum silence duration in samples
    min_silence_samples: usize,
    /// Current state
    current_state: VadResult,
    /// Counter for state persistence
    state_counter: usize,
    /// Running average of energy for adaptive threshold
    energy_avg: f32,
    /// Smoothing factor for energy average
    energy_alpha: f32,
}

impl VoiceActivityDetector {
    /// Create a new VAD instance
    pub fn new(config: &VadConfig, sample_rate: u32) -> Self {
        let min_speech_samples = (config.min_speech_duration * sample_rate as f32) as usize;
        let min_silence_samples = (config.min_silence_duration * sample_rate as f32) as usize;

        Self {
            threshold: config.threshold,
            min_speech_samples,
            min_silence_samples,
            current_state: VadResult::Silence,
            state_counter: 0,
            energy_avg: 0.0,
            energy_alpha: 0.01, // Slow adaptation
        }
    }

    /// Process a frame of audio and return VAD result
    pub fn process(&mut self, samples: &[f32]) -> VadResult {
        let energy = self.calculate_energy(samples);

        // Update running average
        self.energy_avg = self.energy_alpha * energy + (1.0 - self.energy_alpha) * self.energy_avg;

        // Speech if energy exceeds the absolute threshold or clearly
        // stands out over the running average
        let is_speech = energy > self.threshold
            || (self.energy_avg > 0.001 && energy > self.energy_avg * 2.0);

        // State machine with hysteresis
        match (self.current_state, is_speech) {
            (VadResult::Silence, true) => {
                self.state_counter += samples.len();
                if self.state_counter >= self.min_speech_samples {
                    self.current_state = VadResult::Speech;
                    self.state_counter = 0;
                    trace!("VAD: Silence -> Speech (energy: {:.4})", energy);
                }
            }
            (VadResult::Silence, false) => {
                self.state_counter = 0;
            }
            (VadResult::Speech, false) => {
                self.state_counter += samples.len();
                if self.state_counter >= self.min_silence_samples {
                    self.current_state = VadResult::Silence;
                    self.state_counter = 0;
                    trace!("VAD: Speech -> Silence (energy: {:.4})", energy);
                }
            }
            (VadResult::Speech, true) => {
                self.state_counter = 0;
            }
        }

        self.current_state
    }

    /// Calculate RMS energy of audio samples
    fn calculate_energy(&self, samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }

        let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
        (sum_squares / samples.len() as f32).sqrt()
    }

    /// Get current VAD state
    pub fn current_state(&self) -> VadResult {
        self.current_state
    }
}

/// Filter that keeps only voiced regions of a clip
///
/// Walks the audio in 20 ms frames and copies frames the VAD classifies
/// as speech, plus a short pre-roll before each onset. Pauses shorter
/// than the configured minimum silence stay inside the voiced region,
/// so internal sentence gaps survive filtering.
pub struct SpeechFilter {
    vad: VoiceActivityDetector,
    /// Frame size in samples (20 ms)
    frame_size: usize,
    /// Pre-roll length in samples
    pre_roll_samples: usize,
}

impl SpeechFilter {
    /// Create a new speech filter
    pub fn new(config: &VadConfig, sample_rate: u32) -> Self {
        Self {
            vad: VoiceActivityDetector::new(config, sample_rate),
            frame_size: sample_rate as usize / 50,
            pre_roll_samples: (config.pre_roll * sample_rate as f32) as usize,
        }
    }

    /// Return the voiced samples of the clip, in order
    ///
    /// An empty result means the clip contains no detectable speech.
    pub fn filter(&mut self, samples: &[f32]) -> Vec<f32> {
        let mut voiced = Vec::new();
        let mut pre_roll: Vec<f32> = Vec::with_capacity(self.pre_roll_samples);
        let mut in_speech = false;

        for chunk in samples.chunks(self.frame_size) {
            match self.vad.process(chunk) {
                VadResult::Speech => {
                    if !in_speech {
                        voiced.extend(&pre_roll);
                        in_speech = true;
                    }
                    voiced.extend(chunk);
                }
                VadResult::Silence => {
                    in_speech = false;
                }
            }

            pre_roll.extend(chunk);
            if pre_roll.len() > self.pre_roll_samples {
                let excess = pre_roll.len() - self.pre_roll_samples;
                pre_roll.drain(0..excess);
            }
        }

        voiced
    }
}
