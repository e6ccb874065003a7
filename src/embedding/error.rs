use std::path::PathBuf;
use thiserror::Error;

/// Failures of the sentence embedder and the shared tokenizer loader.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model directory or one of its files (weights, config, tokenizer) is absent.
    #[error("sentence embedder model missing at {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("could not load sentence embedder weights: {reason}")]
    ModelLoadFailed { reason: String },

    /// Forward pass or pooling failed for a query or page text.
    #[error("could not embed text: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize text for embedding: {reason}")]
    TokenizationFailed { reason: String },

    /// Rejected [`EmbedderConfig`](super::EmbedderConfig), e.g. a zero dimension.
    #[error("invalid sentence embedder config: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
