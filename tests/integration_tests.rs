//! Integration tests for transcriber

use std::path::Path;
use std::process::Command;

use transcriber::{
    output, Config, ModelSize, SpeechFilter, SttConfig, TranscriptionResult,
    TranscriptionSegment, VadConfig, WHISPER_SAMPLE_RATE,
};

/// Generate synthetic audio that simulates speech
fn generate_speech(sample_rate: u32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            // Mix of frequencies to simulate speech formants
            let f1 = 300.0;
            let f2 = 1000.0;
            let f3 = 2500.0;

            amplitude
                * (0.5 * (2.0 * std::f32::consts::PI * f1 * t).sin()
                    + 0.3 * (2.0 * std::f32::consts::PI * f2 * t).sin()
                    + 0.2 * (2.0 * std::f32::consts::PI * f3 * t).sin())
        })
        .collect()
}

/// Generate silence with minimal noise
fn generate_silence(sample_rate: u32, duration_secs: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    vec![0.0001; num_samples]
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.stt.model_size, ModelSize::Tiny);
    assert!(config.stt.model_path.is_none());
    assert!(config.stt.language.is_none());
    assert!(!config.stt.translate);
    assert!(config.vad.threshold > 0.0);
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
        [stt]
        model_size = "medium"
        language = "ja"

        [vad]
        threshold = 0.02
        min_silence_duration = 0.3
    "#;

    let config: Config = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.stt.model_size, ModelSize::Medium);
    assert_eq!(config.stt.language.as_deref(), Some("ja"));
    assert_eq!(config.vad.threshold, 0.02);
    assert_eq!(config.vad.min_silence_duration, 0.3);
}

#[test]
fn test_wav_roundtrip_through_filter() {
    // Write a WAV with silence around speech, decode it, filter it
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speech.wav");

    let mut audio = Vec::new();
    audio.extend(generate_silence(WHISPER_SAMPLE_RATE, 0.5));
    audio.extend(generate_speech(WHISPER_SAMPLE_RATE, 1.0, 0.3));
    audio.extend(generate_silence(WHISPER_SAMPLE_RATE, 0.5));
    write_wav(&path, &audio, WHISPER_SAMPLE_RATE);

    let loaded = transcriber::load_wav(&path).expect("Failed to load WAV");
    assert_eq!(loaded.len(), audio.len());

    let mut filter = SpeechFilter::new(&Config::default().vad, WHISPER_SAMPLE_RATE);
    let voiced = filter.filter(&loaded);

    assert!(!voiced.is_empty(), "speech should survive filtering");
    assert!(
        voiced.len() < loaded.len(),
        "leading and trailing silence should be dropped"
    );
}

#[test]
fn test_silent_wav_filters_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");

    write_wav(
        &path,
        &generate_silence(WHISPER_SAMPLE_RATE, 2.0),
        WHISPER_SAMPLE_RATE,
    );

    let loaded = transcriber::load_wav(&path).expect("Failed to load WAV");
    let mut filter = SpeechFilter::new(&Config::default().vad, WHISPER_SAMPLE_RATE);
    let voiced = filter.filter(&loaded);

    // A fully silent clip produces an empty transcript without inference
    assert!(voiced.is_empty());
    let result = TranscriptionResult::from_segments(vec![]);
    assert_eq!(output::format_transcript(&result.text), r#"{"text": ""}"#);
}

#[test]
fn test_resampled_wav_keeps_speech() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hi-rate.wav");

    let mut audio = Vec::new();
    audio.extend(generate_silence(44100, 0.3));
    audio.extend(generate_speech(44100, 1.0, 0.3));
    audio.extend(generate_silence(44100, 0.3));
    write_wav(&path, &audio, 44100);

    let loaded = transcriber::load_wav(&path).expect("Failed to load WAV");

    let mut filter = SpeechFilter::new(&VadConfig::default(), WHISPER_SAMPLE_RATE);
    let voiced = filter.filter(&loaded);

    assert!(
        !voiced.is_empty(),
        "speech should still be detected after resampling"
    );
}

#[test]
fn test_transcript_concatenation_law() {
    let segments = vec![
        TranscriptionSegment {
            text: "Hello ".to_string(),
            start_ms: 0,
            end_ms: 500,
        },
        TranscriptionSegment {
            text: "world".to_string(),
            start_ms: 500,
            end_ms: 1000,
        },
    ];

    let result = TranscriptionResult::from_segments(segments);
    assert_eq!(result.text, "Hello world");
    assert_eq!(
        output::format_transcript(&result.text),
        r#"{"text": "Hello world"}"#
    );
}

#[test]
fn test_json_output_non_ascii() {
    let formatted = output::format_transcript("こんにちは");
    assert!(formatted.contains("こんにちは"));
    assert!(!formatted.contains("\\u"));

    let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(parsed["text"], "こんにちは");
}

#[test]
fn test_missing_argument_payload() {
    assert_eq!(
        output::format_error("no audio path given"),
        r#"{"error": "no audio path given"}"#
    );
}

#[test]
fn test_cli_no_args_prints_error_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_transcriber"))
        .output()
        .expect("failed to run transcriber");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"error\": \"no audio path given\"}\n"
    );
}

#[test]
fn test_cli_missing_file_fails_without_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_transcriber"))
        .arg("missing-file.wav")
        .output()
        .expect("failed to run transcriber");

    assert!(!output.status.success());
    assert!(
        output.stdout.is_empty(),
        "unreadable input must not produce a JSON line, got: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert!(!output.stderr.is_empty(), "diagnostic goes to stderr");
}

#[test]
fn test_cli_silent_wav_prints_empty_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_wav(
        &path,
        &generate_silence(WHISPER_SAMPLE_RATE, 2.0),
        WHISPER_SAMPLE_RATE,
    );

    // The voice activity filter removes everything, so this completes
    // without model weights
    let output = Command::new(env!("CARGO_BIN_EXE_transcriber"))
        .arg(&path)
        .output()
        .expect("failed to run transcriber");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"text\": \"\"}\n"
    );
}

#[test]
fn test_engine_rejects_missing_model() {
    let dir = tempfile::tempdir().unwrap();

    let config = SttConfig {
        model_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let result = transcriber::SttEngine::new(config);
    assert!(result.is_err(), "empty model dir must fail model loading");
}
