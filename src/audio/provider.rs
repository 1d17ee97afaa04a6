//! Audio emotion provider tying the pipeline together.

use std::path::Path;
use tracing::debug;

use crate::result::EmotionResult;

use super::classifier::classify_features;
use super::config::MfccConfig;
use super::loader::load_mono_16k;
use super::mfcc::MfccExtractor;
use super::AudioEmotionError;

/// Classifies audio files by emotion.
///
/// Holds only the pre-computed MFCC machinery; aside from scratch buffers
/// reused between calls, every prediction is a pure function of the file's
/// bytes, so identical input yields identical output.
pub struct AudioEmotionProvider {
    extractor: MfccExtractor,
}

impl AudioEmotionProvider {
    pub fn new(config: MfccConfig) -> Result<Self, AudioEmotionError> {
        let extractor = MfccExtractor::new(config)?;
        Ok(Self { extractor })
    }

    /// Classify a WAV file into the four audio emotion classes.
    pub fn predict(&mut self, path: &Path) -> Result<EmotionResult, AudioEmotionError> {
        let samples = load_mono_16k(path)?;
        debug!("Loaded {:?}: {} samples at 16 kHz", path, samples.len());

        let features = self.extractor.mean_features(&samples)?;
        classify_features(&features)
    }

    /// Extract the mean-MFCC feature vector without classifying.
    pub fn features(&mut self, path: &Path) -> Result<Vec<f32>, AudioEmotionError> {
        let samples = load_mono_16k(path)?;
        self.extractor.mean_features(&samples)
    }
}
