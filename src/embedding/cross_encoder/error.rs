use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::error::EmbeddingError;

#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("cross-encoder model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load cross-encoder model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("cross-encoder inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid cross-encoder configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("scorer not available: {reason}")]
    NotAvailable { reason: String },
}

impl From<candle_core::Error> for RerankerError {
    fn from(err: candle_core::Error) -> Self {
        RerankerError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<EmbeddingError> for RerankerError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::TokenizationFailed { reason } => {
                RerankerError::TokenizationFailed { reason }
            }
            EmbeddingError::ModelNotFound { path } => RerankerError::ModelNotFound { path },
            EmbeddingError::ModelLoadFailed { reason } => RerankerError::ModelLoadFailed { reason },
            other => RerankerError::InferenceFailed {
                reason: other.to_string(),
            },
        }
    }
}
