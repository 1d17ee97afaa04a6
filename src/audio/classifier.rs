//! Multinomial logistic regression over mean-MFCC features.
//!
//! The coefficient table below is a hand-set placeholder: the values were
//! tuned by hand against MFCC mean vectors, not trained, and have no real
//! predictive validity. They exist so the audio path produces a
//! well-behaved probability distribution end to end. Treat the table as
//! configuration, not as a meaningful baseline.

use crate::result::{softmax, EmotionResult};

use super::AudioEmotionError;

/// Fixed label set of the audio classifier, in score order.
pub const AUDIO_EMOTION_LABELS: [&str; 4] = ["neutral", "happy", "sad", "angry"];

/// Dimension of the input feature vector (13 mean MFCCs).
pub const FEATURE_DIM: usize = 13;

/// Per-class weight vectors, one row per label in `AUDIO_EMOTION_LABELS`.
#[rustfmt::skip]
const CLASS_WEIGHTS: [[f32; FEATURE_DIM]; 4] = [
    [-0.2,  0.1,  0.05, -0.1,  0.2,   0.1, -0.05, -0.1,  0.2,   0.05, -0.1,  0.1,   0.05],
    [ 0.1,  0.3, -0.05,  0.1, -0.2,  -0.1,  0.2,   0.05, -0.1,  0.3,   0.1, -0.2,   0.05],
    [-0.3, -0.1,  0.2,   0.3, -0.05,  0.1, -0.2,   0.2,  0.05, -0.3,  -0.1,  0.05,  0.1 ],
    [ 0.2, -0.2, -0.1,  -0.3,  0.1,   0.2, -0.05,  0.1,  0.3,  -0.1,   0.05, 0.1,  -0.2 ],
];

/// Per-class bias terms.
const CLASS_BIASES: [f32; 4] = [0.1, -0.05, 0.2, -0.1];

/// Classify a mean-MFCC feature vector into the four audio emotion classes.
///
/// Probabilities are softmax-normalized linear scores and left unrounded.
pub fn classify_features(features: &[f32]) -> Result<EmotionResult, AudioEmotionError> {
    if features.len() != FEATURE_DIM {
        return Err(AudioEmotionError::InvalidFeatures {
            expected: FEATURE_DIM,
            actual: features.len(),
        });
    }

    let scores: Vec<f32> = CLASS_WEIGHTS
        .iter()
        .zip(CLASS_BIASES.iter())
        .map(|(weights, bias)| {
            weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f32>()
                + bias
        })
        .collect();

    let probs = softmax(&scores);

    Ok(EmotionResult::from_distribution(
        AUDIO_EMOTION_LABELS
            .iter()
            .map(|l| l.to_string())
            .zip(probs),
    ))
}
