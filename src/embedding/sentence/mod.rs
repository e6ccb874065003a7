//! Sentence embedder (BERT + mean pooling).
//!
//! Use [`EmbedderConfig::stub`] for tests and local runs without model files.
//! The stub hashes lowercase word tokens into a fixed number of buckets, so
//! identical text embeds identically and texts sharing words land nearby.

/// Embedder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::EmbedderConfig;

use std::sync::Arc;

use candle_core::{Device, Tensor};
use half::f16;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer;
use crate::hashing::hash_to_u64;

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Text embedder used by the vector index bindings.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            EmbedderBackend::Model { device, .. } => format!("Model({})", device_label(device)),
            EmbedderBackend::Stub => "Stub".to_string(),
        };
        f.debug_struct("SentenceEmbedder")
            .field("backend", &backend)
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder (stub mode when no model directory is configured).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_dir) = config.model_dir.clone() else {
            warn!(
                embedding_dim = config.embedding_dim,
                "Sentence embedder running in STUB mode"
            );
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for embedder");

        let encoder =
            BertEncoder::load(&model_dir, &device).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            })?;

        validate_embedding_dim(encoder.hidden_size(), config.embedding_dim).map_err(|e| {
            EmbeddingError::InvalidConfig {
                reason: e.to_string(),
            }
        })?;

        let tokenizer = load_tokenizer(&model_dir, config.max_seq_len)?;

        info!(
            model_dir = %model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Creates a stub embedder with the default dimension.
    pub fn stub() -> Self {
        Self {
            backend: EmbedderBackend::Stub,
            config: EmbedderConfig::stub(),
        }
    }

    /// Creates a stub embedder with a custom dimension.
    pub fn stub_with_dim(embedding_dim: usize) -> Self {
        Self {
            backend: EmbedderBackend::Stub,
            config: EmbedderConfig::stub().with_embedding_dim(embedding_dim),
        }
    }

    /// Embeds a single string into an L2-normalised vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f16>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    /// Embeds a batch of strings (sequentially; no padding required).
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f16>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f16>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![f16::ZERO; self.config.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Generating embedding"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = encoder
            .forward_pooled(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(normalize_to_f16(embedding))
    }

    fn embed_stub(&self, text: &str) -> Vec<f16> {
        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let h = hash_to_u64(token.as_bytes());
            let bucket = (h % dim as u64) as usize;
            let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[bucket] += sign;
        }

        normalize_to_f16(embedding)
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}

fn normalize_to_f16(mut embedding: Vec<f32>) -> Vec<f16> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding.into_iter().map(f16::from_f32).collect()
}

/// Squared Euclidean distance of unit vectors with cosine similarity `similarity`.
///
/// `|a - b|² = 2 · (1 - cos)` for L2-normalised embeddings, so the result lies
/// in `[0, 4]`. This is the scale cache thresholds are expressed in.
#[inline]
pub fn distance_from_similarity(similarity: f32) -> f32 {
    (2.0 * (1.0 - similarity)).max(0.0)
}

/// Squared L2 distance between two embeddings after normalising both.
///
/// Zero or mismatched vectors are treated as orthogonal to everything: `2.0`.
pub fn squared_l2_distance(a: &[f16], b: &[f16]) -> f32 {
    const ORTHOGONAL: f32 = 2.0;

    if a.len() != b.len() || a.is_empty() {
        return ORTHOGONAL;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b)
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (av, bv)| {
                let av = av.to_f32();
                let bv = bv.to_f32();
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return ORTHOGONAL;
    }

    distance_from_similarity(dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt()))
}
