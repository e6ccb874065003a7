use crate::vectordb::VectorDbError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the cache tier.
pub enum CacheError {
    /// The cache index could not be queried or written.
    #[error("cache index unavailable: {0}")]
    IndexUnavailable(#[from] VectorDbError),

    /// A stored record could not be decoded.
    #[error("corrupt cache record: {reason}")]
    CorruptRecord {
        /// What was wrong with the record.
        reason: String,
    },

    /// Results could not be encoded for storage.
    #[error("failed to encode cache record: {reason}")]
    EncodeFailed {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
