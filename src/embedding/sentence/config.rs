use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDER_MAX_SEQ_LEN, DEFAULT_EMBEDDING_DIM};
use crate::embedding::bert::missing_model_file;
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct EmbedderConfig {
    /// Model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// `None` selects stub mode.
    pub model_dir: Option<PathBuf>,
    /// Max tokens per input; longer text is truncated.
    pub max_seq_len: usize,
    /// Output embedding dimension (must equal the model's hidden size).
    pub embedding_dim: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: DEFAULT_EMBEDDER_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl EmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_PATH: &'static str = "RAGCACHE_EMBEDDER_PATH";
    /// Env var overriding the embedding dimension.
    pub const ENV_EMBEDDING_DIM: &'static str = "RAGCACHE_EMBEDDING_DIM";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; deterministic embeddings).
    pub fn stub() -> Self {
        Self::default()
    }

    /// Loads config from environment variables (missing path means stub mode).
    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let embedding_dim = std::env::var(Self::ENV_EMBEDDING_DIM)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_EMBEDDING_DIM);

        Self {
            model_dir,
            embedding_dim,
            ..Default::default()
        }
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    /// Returns `true` if no model directory is configured.
    pub fn is_stub(&self) -> bool {
        self.model_dir.is_none()
    }

    /// Validates dimensions and, outside stub mode, the model directory contents.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be > 0".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be > 0".to_string(),
            });
        }

        let Some(dir) = &self.model_dir else {
            return Ok(());
        };

        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
        }

        if let Some(file) = missing_model_file(dir) {
            return Err(EmbeddingError::ModelNotFound {
                path: dir.join(file),
            });
        }

        Ok(())
    }
}
