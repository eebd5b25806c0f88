//! Model file resolution and downloading

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ModelSize, SttConfig};
use crate::error::{EngineError, Result};

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Resolve the ggml model file for a configuration
///
/// A direct `model_path` must already exist. With an explicit
/// `model_dir` the file must be present there; only the default cache
/// directory triggers a download on first use.
pub fn resolve_model(config: &SttConfig) -> Result<PathBuf> {
    if let Some(ref path) = config.model_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(EngineError::ModelNotFound(path.display().to_string()).into());
    }

    let file_name = config.model_size.file_name();

    if let Some(ref dir) = config.model_dir {
        let path = dir.join(&file_name);
        if path.exists() {
            return Ok(path);
        }
        return Err(EngineError::ModelNotFound(path.display().to_string()).into());
    }

    let path = default_model_dir().join(&file_name);
    if path.exists() {
        return Ok(path);
    }

    download_model(config.model_size, &path)?;
    Ok(path)
}

/// Model cache directory in the user's cache dir
fn default_model_dir() -> PathBuf {
    let cache_dir = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    cache_dir.join("transcriber").join("models")
}

/// Download a model from the whisper.cpp repository
fn download_model(size: ModelSize, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| EngineError::ModelDownload(e.to_string()))?;
    }

    let url = format!("{}/{}", MODEL_BASE_URL, size.file_name());
    info!("Downloading {} model from {}", size, url);

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(std::time::Duration::from_secs(30))
        .timeout_read(std::time::Duration::from_secs(300))
        .build();

    let response = agent
        .get(&url)
        .call()
        .map_err(|e| EngineError::ModelDownload(e.to_string()))?;

    let total_size = response
        .header("Content-Length")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    // Write to a temp name, rename on success; a failed download must
    // not leave a partial file that resolves on the next run
    let partial = dest.with_extension("part");
    let mut file = fs::File::create(&partial)
        .map_err(|e| EngineError::ModelDownload(e.to_string()))?;

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut downloaded = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| EngineError::ModelDownload(e.to_string()))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| EngineError::ModelDownload(e.to_string()))?;
        downloaded += bytes_read as u64;
    }

    if total_size > 0 && downloaded != total_size {
        let _ = fs::remove_file(&partial);
        return Err(EngineError::ModelDownload(format!(
            "incomplete download: expected {} bytes, got {}",
            total_size, downloaded
        ))
        .into());
    }

    fs::rename(&partial, dest).map_err(|e| EngineError::ModelDownload(e.to_string()))?;
    info!("Model saved to {}", dest.display());

    Ok(())
}
