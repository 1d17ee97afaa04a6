//! The emotion result contract shared by both classifiers.
//!
//! Every classification produces an [`EmotionResult`]: the dominant label,
//! its probability, and the full probability distribution over the label set
//! in a fixed, insertion-ordered map. The label set is runtime-determined
//! for the text model (read from its configuration) and a compile-time
//! constant of four for the audio model; both feed the same shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel label used when a classification call fails.
pub const ERROR_LABEL: &str = "error";

/// A probability distribution over emotion labels.
///
/// Invariants:
/// - `all_emotions[dominant_emotion] == confidence` exactly
/// - `dominant_emotion` is the argmax of `all_emotions`, ties broken by
///   first-seen label order
/// - values sum to 1.0 within floating-point tolerance (except for the
///   degraded form, where the sole `"error"` entry is 0.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub dominant_emotion: String,
    pub confidence: f32,
    pub all_emotions: IndexMap<String, f32>,
    /// Failure message when this is a degraded result; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub error: Option<String>,
}

impl EmotionResult {
    /// Build a result from an ordered label/probability distribution.
    ///
    /// The dominant label is the first label with the maximum probability,
    /// so insertion order decides ties deterministically.
    pub fn from_distribution<I>(distribution: I) -> Self
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        let all_emotions: IndexMap<String, f32> = distribution.into_iter().collect();

        let mut dominant_emotion = String::new();
        let mut confidence = f32::NEG_INFINITY;
        for (label, &prob) in all_emotions.iter() {
            if prob > confidence {
                confidence = prob;
                dominant_emotion = label.clone();
            }
        }

        Self {
            dominant_emotion,
            confidence,
            all_emotions,
            error: None,
        }
    }

    /// Build the degraded result produced when a classification fails.
    ///
    /// The map holds the sentinel `"error"` label as its sole entry and the
    /// failure message rides in `error`, so renderers that only know the
    /// distribution shape still display something sensible.
    pub fn degraded(message: impl Into<String>) -> Self {
        let mut all_emotions = IndexMap::new();
        all_emotions.insert(ERROR_LABEL.to_string(), 0.0);

        Self {
            dominant_emotion: ERROR_LABEL.to_string(),
            confidence: 0.0,
            all_emotions,
            error: Some(message.into()),
        }
    }

    /// Whether this result came from a failed classification.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Sum of all probabilities (1.0 within tolerance for live results).
    pub fn probability_sum(&self) -> f32 {
        self.all_emotions.values().sum()
    }
}

/// Convert a failed classification into the degraded result uniformly.
///
/// Both classifiers return typed errors internally; callers that present
/// results to a user apply this once so neither modality leaks errors past
/// the classification boundary.
pub trait OrDegraded {
    fn or_degraded(self) -> EmotionResult;
}

impl<E: std::fmt::Display> OrDegraded for Result<EmotionResult, E> {
    fn or_degraded(self) -> EmotionResult {
        match self {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Classification failed: {}", e);
                EmotionResult::degraded(e.to_string())
            }
        }
    }
}

/// Numerically stable softmax over raw scores.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Round a probability to four decimal digits.
pub fn round4(p: f32) -> f32 {
    (p * 10_000.0).round() / 10_000.0
}
