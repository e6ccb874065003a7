//! Cross-encoder relevance scoring for (query, passage) pairs.
//!
//! With a model directory this runs a BERT sequence classifier and returns its
//! raw logit. Without one it falls back to a lexical-overlap score in `[0, 1]`.

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::CrossEncoderConfig;
pub use error::RerankerError;

use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::{BertClassifier, missing_model_file};
use crate::embedding::device::{device_label, select_device};
use crate::embedding::utils::load_tokenizer;

struct LoadedModel {
    classifier: BertClassifier,
    tokenizer: Tokenizer,
    device: Device,
}

pub struct CrossEncoder {
    config: CrossEncoderConfig,
    model: Option<LoadedModel>,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field(
                "device",
                &self.model.as_ref().map(|m| device_label(&m.device)),
            )
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: CrossEncoderConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let Some(model_dir) = config.model_dir.clone() else {
            warn!("No cross-encoder model configured, scoring with lexical overlap");
            return Ok(Self {
                config,
                model: None,
            });
        };

        if !model_dir.is_dir() {
            return Err(RerankerError::ModelNotFound { path: model_dir });
        }
        if let Some(file) = missing_model_file(&model_dir) {
            return Err(RerankerError::ModelLoadFailed {
                reason: format!("Missing {} in {}", file, model_dir.display()),
            });
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for cross-encoder");

        let classifier = BertClassifier::load(&model_dir, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;
        let tokenizer = load_tokenizer(&model_dir, config.max_seq_len)?;

        info!(
            model_dir = %model_dir.display(),
            max_seq_len = config.max_seq_len,
            "Cross-encoder loaded"
        );

        Ok(Self {
            config,
            model: Some(LoadedModel {
                classifier,
                tokenizer,
                device,
            }),
        })
    }

    /// Lexical stub scorer; never fails.
    pub fn stub() -> Self {
        Self {
            config: CrossEncoderConfig::stub(),
            model: None,
        }
    }

    /// Scores one (query, passage) pair; higher means more relevant.
    pub fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        let Some(model) = &self.model else {
            return Ok(lexical_overlap_score(query, passage));
        };

        let encoding = model.tokenizer.encode((query, passage), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input_ids = Tensor::new(encoding.get_ids(), &model.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &model.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &model.device)?.unsqueeze(0)?;

        let logits = model
            .classifier
            .forward(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let scores = logits.flatten_all()?.to_vec1::<f32>()?;
        let score = scores
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "classifier returned no logits".to_string(),
            })?;

        debug!(
            query_len = query.len(),
            passage_len = passage.len(),
            score,
            "Scored pair"
        );

        Ok(score)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &CrossEncoderConfig {
        &self.config
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "do", "does", "did", "i", "my",
    "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "and", "or", "if", "how",
    "what", "when", "where", "which", "who", "this", "that", "it", "its", "can", "will", "should",
];

fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Blend of query-term recall and Jaccard overlap, squashed through a sigmoid.
fn lexical_overlap_score(query: &str, passage: &str) -> f32 {
    let query_words = content_words(query);
    if query_words.is_empty() {
        return 0.0;
    }
    let passage_words = content_words(passage);

    let matches = query_words.intersection(&passage_words).count() as f32;
    let union = query_words.union(&passage_words).count() as f32;

    let recall = matches / query_words.len() as f32;
    let jaccard = matches / union;
    let base = 0.6 * recall + 0.4 * jaccard;

    1.0 / (1.0 + (-8.0 * (base - 0.5)).exp())
}
