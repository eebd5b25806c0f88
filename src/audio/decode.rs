//! WAV decoding and resampling to the Whisper input format

use std::path::Path;

use rubato::{FftFixedIn, Resampler};
use tracing::debug;

use crate::error::{AudioError, Result};

/// Sample rate Whisper models expect (Hz)
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Load a WAV file as mono f32 samples at 16 kHz
///
/// Multi-channel audio is downmixed by averaging; integer PCM is
/// normalized to [-1.0, 1.0]; other sample rates are resampled.
pub fn load_wav(path: &Path) -> Result<Vec<f32>> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| AudioError::Open(e.to_string()))?;

    let spec = reader.spec();
    debug!(
        "WAV format: {} channels, {} Hz, {} bits",
        spec.channels, spec.sample_rate, spec.bits_per_sample
    );

    if spec.channels == 0 {
        return Err(AudioError::UnsupportedFormat("zero channels".to_string()).into());
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AudioError::Decode(e.to_string()))?,
        hound::SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| AudioError::Decode(e.to_string()))?
        }
    };

    let mono = downmix(&samples, spec.channels);

    if spec.sample_rate == WHISPER_SAMPLE_RATE {
        Ok(mono)
    } else {
        resample(&mono, spec.sample_rate, WHISPER_SAMPLE_RATE)
    }
}

/// Average interleaved channels into a mono signal
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample a mono signal to the target rate
///
/// The last partial chunk is zero-padded; the resampler's latency also
/// shifts a little silence into the output. The voice activity filter
/// downstream strips both.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    debug!("Resampling: {} Hz -> {} Hz", from_rate, to_rate);

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        1024, // chunk size
        1,    // sub-chunks
        1,    // channels
    )
    .map_err(|e| AudioError::Resampling(e.to_string()))?;

    let estimated = samples.len() as u64 * to_rate as u64 / from_rate as u64;
    let mut output = Vec::with_capacity(estimated as usize + 1024);

    let mut pos = 0;
    while pos < samples.len() {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(samples.len());
        let mut chunk = samples[pos..end].to_vec();
        chunk.resize(needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioError::Resampling(e.to_string()))?;

        if let Some(channel) = resampled.into_iter().next() {
            output.extend(channel);
        }

        pos += needed;
    }

    Ok(output)
}
