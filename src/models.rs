//! Model downloading and management.
//!
//! Fetches the text emotion model artifacts on first run:
//! - model.onnx (DistilRoBERTa sequence classifier, ONNX export)
//! - tokenizer.json (HuggingFace tokenizer definition)
//! - config.json (label set and architecture metadata)
//!
//! The audio classifier's coefficients are compiled in and need no files.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::text::provider::{CONFIG_FILE, MODEL_FILE, TOKENIZER_FILE};

/// Base URL for the text emotion model (ONNX community export of
/// emotion-english-distilroberta-base).
const TEXT_MODEL_BASE_URL: &str =
    "https://huggingface.co/onnx-community/emotion-english-distilroberta-base-ONNX/resolve/main";

/// Artifacts that make up the text model, as (filename, url path) pairs.
const TEXT_MODEL_ARTIFACTS: [(&str, &str); 3] = [
    (MODEL_FILE, "onnx/model.onnx"),
    (TOKENIZER_FILE, "tokenizer.json"),
    (CONFIG_FILE, "config.json"),
];

/// Errors that can occur during model operations
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to download model: {0}")]
    DownloadError(String),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("Failed to write model file: {0}")]
    WriteError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Download a file from URL to the specified path
fn download_file(url: &str, dest_path: &Path) -> Result<(), ModelError> {
    info!("Downloading from {} to {:?}", url, dest_path);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ModelError::DirectoryError(e.to_string()))?;
    }

    let response = reqwest::blocking::Client::new()
        .get(url)
        .send()
        .map_err(|e| ModelError::NetworkError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ModelError::DownloadError(format!(
            "HTTP {} for {}",
            response.status(),
            url
        )));
    }

    let total_size = response.content_length();
    info!(
        "Download started, total size: {}",
        total_size
            .map(|s| format!("{:.1} MB", s as f64 / 1_000_000.0))
            .unwrap_or_else(|| "unknown".to_string())
    );

    // Download to a temp file first, then rename into place
    let temp_path = dest_path.with_extension("download");
    let mut file = File::create(&temp_path).map_err(|e| ModelError::WriteError(e.to_string()))?;

    let bytes = response
        .bytes()
        .map_err(|e| ModelError::NetworkError(e.to_string()))?;

    file.write_all(&bytes)
        .map_err(|e| ModelError::WriteError(e.to_string()))?;
    file.flush()
        .map_err(|e| ModelError::WriteError(e.to_string()))?;

    fs::rename(&temp_path, dest_path).map_err(|e| ModelError::WriteError(e.to_string()))?;

    info!("Download complete: {:?}", dest_path);
    Ok(())
}

/// Default directory for the text model artifacts.
pub fn text_model_dir() -> Result<PathBuf> {
    Ok(Config::models_dir()?.join("text-emotion"))
}

/// Download any missing text model artifacts into the given directory.
pub fn ensure_text_model(model_dir: &Path) -> Result<()> {
    for (filename, url_path) in TEXT_MODEL_ARTIFACTS {
        let dest = model_dir.join(filename);
        if dest.exists() {
            debug!("Text model artifact already exists: {:?}", dest);
            continue;
        }

        let url = format!("{}/{}", TEXT_MODEL_BASE_URL, url_path);
        download_file(&url, &dest)
            .with_context(|| format!("Failed to download text model artifact {}", filename))?;
    }

    Ok(())
}

/// Check whether all text model artifacts are present locally.
pub fn is_text_model_available(model_dir: &Path) -> bool {
    TEXT_MODEL_ARTIFACTS
        .iter()
        .all(|(filename, _)| model_dir.join(filename).exists())
}

/// Model status for the frontend
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub available: bool,
    pub path: Option<String>,
    pub size_bytes: Option<u64>,
    pub download_url: String,
}

/// Get information about the models in use
pub fn get_model_info(model_dir: &Path) -> Vec<ModelInfo> {
    let available = is_text_model_available(model_dir);

    vec![
        ModelInfo {
            name: "Text Emotion (DistilRoBERTa ONNX)".to_string(),
            available,
            path: available.then(|| model_dir.to_string_lossy().to_string()),
            size_bytes: Some(330_000_000), // ~330 MB
            download_url: TEXT_MODEL_BASE_URL.to_string(),
        },
        ModelInfo {
            name: "Audio Emotion (built-in logistic model)".to_string(),
            available: true,
            path: None,
            size_bytes: None,
            download_url: String::new(),
        },
    ]
}
