//! Text emotion classification.
//!
//! Wraps a pre-trained DistilRoBERTa sequence-classification model (ONNX
//! export) behind the shared [`EmotionResult`](crate::result::EmotionResult)
//! contract. The label set is read from the model's own configuration at
//! load time rather than hardcoded here.

pub mod provider;

pub use provider::TextEmotionProvider;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the text classification pipeline.
#[derive(Debug, Error)]
pub enum TextEmotionError {
    #[error("Model artifact not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    #[error("Failed to load tokenizer: {0}")]
    TokenizerError(String),

    #[error("Invalid model configuration: {0}")]
    ConfigError(String),

    #[error("Tokenization failed: {0}")]
    TokenizeError(String),

    #[error("Inference failed: {0}")]
    InferenceError(String),
}
