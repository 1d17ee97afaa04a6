//! Facade over the two emotion classifiers.
//!
//! Consumers (HTTP handlers, the REPL tool) call `classify_text` and
//! `classify_audio` and always get an [`EmotionResult`] back: per-call
//! failures from either modality become the degraded result instead of
//! propagating, so one bad input can never take down a session. Only model
//! loading at construction is allowed to fail.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::audio::{AudioEmotionProvider, MfccConfig};
use crate::result::{EmotionResult, OrDegraded};
use crate::text::TextEmotionProvider;

pub struct EmotionEngine {
    text: TextEmotionProvider,
    audio: AudioEmotionProvider,
}

impl EmotionEngine {
    /// Construct both classifiers.
    ///
    /// A text model that cannot be loaded is fatal here; the caller should
    /// abort startup rather than serve without it.
    pub fn new(text_model_dir: &Path, n_threads: i32) -> Result<Self> {
        let text = TextEmotionProvider::new(text_model_dir, n_threads)
            .context("text emotion model unavailable")?;
        let audio = AudioEmotionProvider::new(MfccConfig::default())
            .context("failed to initialize audio feature pipeline")?;

        info!(
            "Emotion engine ready (text labels: {:?}, audio labels: {:?})",
            text.labels(),
            crate::audio::AUDIO_EMOTION_LABELS
        );

        Ok(Self { text, audio })
    }

    /// Classify a text message. Never fails; bad inputs yield a degraded
    /// result.
    pub fn classify_text(&mut self, text: &str) -> EmotionResult {
        debug!("Classifying text ({} chars)", text.len());
        self.text.predict(text).or_degraded()
    }

    /// Classify an audio file. Never fails; unreadable or corrupt files
    /// yield a degraded result.
    pub fn classify_audio(&mut self, path: &Path) -> EmotionResult {
        debug!("Classifying audio file {:?}", path);
        self.audio.predict(path).or_degraded()
    }

    /// The text model's label set.
    pub fn text_labels(&self) -> &[String] {
        self.text.labels()
    }
}
