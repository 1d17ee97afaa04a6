//! Audio emotion classification.
//!
//! The pipeline has two stages:
//! 1. Feature extraction: decode a WAV file to mono 16 kHz samples and
//!    reduce it to a 13-dimensional mean-MFCC vector.
//! 2. Classification: a statically configured multinomial logistic
//!    regression over that vector, softmax-normalized across four classes.

pub mod classifier;
pub mod config;
pub mod loader;
pub mod mfcc;
pub mod provider;

pub use classifier::{AUDIO_EMOTION_LABELS, FEATURE_DIM};
pub use config::MfccConfig;
pub use provider::AudioEmotionProvider;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the audio classification pipeline.
#[derive(Debug, Error)]
pub enum AudioEmotionError {
    #[error("Audio file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to decode audio: {0}")]
    DecodeError(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio stream contains no samples")]
    EmptyAudio,

    #[error("Resampling failed: {0}")]
    ResampleError(String),

    #[error("Feature extraction failed: {0}")]
    FeatureError(String),

    #[error("Expected a {expected}-dimensional feature vector, got {actual}")]
    InvalidFeatures { expected: usize, actual: usize },
}
