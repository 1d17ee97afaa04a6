//! ONNX-based text emotion classifier.
//!
//! Loads the emotion-english-distilroberta-base ONNX export together with
//! its HuggingFace tokenizer and configuration. Inference is a single
//! forward pass; the softmax over the output logits becomes the emotion
//! distribution, with probabilities rounded to four decimal digits.

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::result::{round4, softmax, EmotionResult};

use super::TextEmotionError;

/// Maximum number of tokens fed to the model per call.
const MAX_TOKENS: usize = 512;

/// File names of the model artifacts inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

/// Text emotion classifier over a pre-trained sequence-classification model.
pub struct TextEmotionProvider {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl TextEmotionProvider {
    /// Load the model, tokenizer, and label set from a model directory.
    ///
    /// Fails loudly on any missing or malformed artifact; a process that
    /// cannot load the text model should not start serving.
    pub fn new(model_dir: &Path, n_threads: i32) -> Result<Self, TextEmotionError> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let config_path = model_dir.join(CONFIG_FILE);

        for path in [&model_path, &tokenizer_path, &config_path] {
            if !path.exists() {
                return Err(TextEmotionError::ModelNotFound(path.clone()));
            }
        }

        let config_json = std::fs::read_to_string(&config_path)
            .map_err(|e| TextEmotionError::ConfigError(e.to_string()))?;
        let labels = parse_labels(&config_json)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TextEmotionError::TokenizerError(e.to_string()))?;

        let session = Session::builder()
            .map_err(|e| TextEmotionError::ModelLoadError(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| TextEmotionError::ModelLoadError(e.to_string()))?
            .with_intra_threads(n_threads as usize)
            .map_err(|e| TextEmotionError::ModelLoadError(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e| TextEmotionError::ModelLoadError(e.to_string()))?;

        tracing::info!(
            "Loaded text emotion model from {:?} ({} labels)",
            model_dir,
            labels.len()
        );

        Ok(Self {
            session,
            tokenizer,
            labels,
        })
    }

    /// The model's label set, in logit order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Classify a text into the model's emotion labels.
    ///
    /// Callers are expected to filter empty/whitespace-only input before
    /// calling.
    pub fn predict(&mut self, text: &str) -> Result<EmotionResult, TextEmotionError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TextEmotionError::TokenizeError(e.to_string()))?;

        let len = encoding.get_ids().len().min(MAX_TOKENS);
        if len == 0 {
            return Err(TextEmotionError::TokenizeError(
                "input produced no tokens".to_string(),
            ));
        }

        let input_ids: Vec<i64> = encoding.get_ids()[..len].iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding.get_attention_mask()[..len]
            .iter()
            .map(|&m| m as i64)
            .collect();

        let shape = [1_usize, len];
        let ids_tensor = Value::from_array((shape, input_ids))
            .map_err(|e: ort::Error| TextEmotionError::InferenceError(e.to_string()))?;
        let mask_tensor = Value::from_array((shape, attention_mask))
            .map_err(|e: ort::Error| TextEmotionError::InferenceError(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor
            ])
            .map_err(|e| TextEmotionError::InferenceError(e.to_string()))?;

        // Single output: logits with shape [1, n_labels]
        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| TextEmotionError::InferenceError("No output tensor".to_string()))?;

        let logits_data = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| TextEmotionError::InferenceError(e.to_string()))?;

        let logits: Vec<f32> = logits_data.1.iter().copied().collect();
        if logits.len() < self.labels.len() {
            return Err(TextEmotionError::InferenceError(format!(
                "Expected {} logits, got {}",
                self.labels.len(),
                logits.len()
            )));
        }

        let probs = softmax(&logits[..self.labels.len()]);

        Ok(EmotionResult::from_distribution(
            self.labels
                .iter()
                .cloned()
                .zip(probs.into_iter().map(round4)),
        ))
    }
}

/// Read the ordered label set from the model's config.json (id2label).
fn parse_labels(config_json: &str) -> Result<Vec<String>, TextEmotionError> {
    let config: serde_json::Value = serde_json::from_str(config_json)
        .map_err(|e| TextEmotionError::ConfigError(e.to_string()))?;

    let id2label = config
        .get("id2label")
        .and_then(|v| v.as_object())
        .ok_or_else(|| TextEmotionError::ConfigError("missing id2label".to_string()))?;

    let mut indexed: Vec<(usize, String)> = Vec::with_capacity(id2label.len());
    for (id, label) in id2label {
        let index: usize = id
            .parse()
            .map_err(|_| TextEmotionError::ConfigError(format!("non-numeric label id: {}", id)))?;
        let label = label
            .as_str()
            .ok_or_else(|| TextEmotionError::ConfigError(format!("non-string label for id {}", id)))?;
        indexed.push((index, label.to_string()));
    }

    indexed.sort_by_key(|(index, _)| *index);

    if indexed.is_empty() {
        return Err(TextEmotionError::ConfigError("empty id2label".to_string()));
    }

    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_ordered_by_id() {
        let json = r#"{"id2label": {"2": "joy", "0": "anger", "1": "disgust"}}"#;
        let labels = parse_labels(json).unwrap();
        assert_eq!(labels, vec!["anger", "disgust", "joy"]);
    }

    #[test]
    fn test_parse_labels_full_model_config() {
        // Shape of the emotion-english-distilroberta-base config
        let json = r#"{
            "architectures": ["RobertaForSequenceClassification"],
            "id2label": {
                "0": "anger", "1": "disgust", "2": "fear", "3": "joy",
                "4": "neutral", "5": "sadness", "6": "surprise"
            }
        }"#;
        let labels = parse_labels(json).unwrap();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "anger");
        assert_eq!(labels[3], "joy");
        assert_eq!(labels[6], "surprise");
    }

    #[test]
    fn test_parse_labels_rejects_missing_map() {
        let result = parse_labels(r#"{"architectures": []}"#);
        assert!(matches!(result, Err(TextEmotionError::ConfigError(_))));
    }

    #[test]
    fn test_parse_labels_rejects_bad_ids() {
        let result = parse_labels(r#"{"id2label": {"zero": "anger"}}"#);
        assert!(matches!(result, Err(TextEmotionError::ConfigError(_))));
    }

    #[test]
    fn test_provider_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let result = TextEmotionProvider::new(dir.path(), 1);
        assert!(matches!(result, Err(TextEmotionError::ModelNotFound(_))));
    }
}
