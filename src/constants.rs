//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is fixed per deployment: the sentence embedder, both
//! vector collections and the in-memory index must agree on it. Use
//! [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Output dimension of MiniLM-class sentence encoders.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

pub const DEFAULT_VECTOR_SIZE_U64: u64 = DEFAULT_EMBEDDING_DIM as u64;

/// Max tokens fed to the sentence encoder.
pub const DEFAULT_EMBEDDER_MAX_SEQ_LEN: usize = 256;

/// Max tokens for a (query, passage) pair fed to the cross-encoder.
pub const DEFAULT_CROSS_ENCODER_MAX_SEQ_LEN: usize = 512;

/// Distance ceiling for a semantic cache hit (squared L2 of unit embeddings).
pub const DEFAULT_CACHE_THRESHOLD: f32 = 0.2;

/// Neighbours requested from the main index when the caller gives no limit.
pub const DEFAULT_SEARCH_RESULTS_LIMIT: usize = 10;

/// Results kept after cross-encoder reranking.
pub const DEFAULT_RERANK_TOP_K: usize = 3;

pub const DEFAULT_MAIN_COLLECTION: &str = "Principal_Life_Insurance";
pub const DEFAULT_CACHE_COLLECTION: &str = "Principal_Insurance_Cache";

/// Policy name assumed for legacy cache records, which never stored one.
pub const DEFAULT_POLICY_NAME: &str = "Principal-Sample-Life-Insurance-Policy";

/// Sentinel rerank score carried by results that have not been reranked yet.
pub const UNRANKED_SCORE: f32 = 0.0;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use ragcache::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(384, 384).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(768, 384),
            Err(DimValidationError::DimensionMismatch {
                expected: 384,
                actual: 768
            })
        );
    }

    #[test]
    fn test_validate_embedding_dim_zero_expected() {
        assert_eq!(
            validate_embedding_dim(0, 0),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_defaults_are_consistent() {
        assert!(DEFAULT_RERANK_TOP_K <= DEFAULT_SEARCH_RESULTS_LIMIT);
        assert_ne!(DEFAULT_MAIN_COLLECTION, DEFAULT_CACHE_COLLECTION);
        assert_eq!(DEFAULT_VECTOR_SIZE_U64, DEFAULT_EMBEDDING_DIM as u64);
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension;
        assert_eq!(err.to_string(), "embedding dimension cannot be zero");

        let err = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }
}
