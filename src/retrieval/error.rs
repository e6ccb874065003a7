use crate::vectordb::VectorDbError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the retrieval tier.
pub enum RetrievalError {
    /// The main index could not be queried.
    #[error("main index unavailable: {0}")]
    IndexUnavailable(#[from] VectorDbError),

    /// A hit lacked required provenance metadata.
    #[error("malformed hit for document {document_id}: missing '{field}'")]
    MalformedHit {
        /// Offending document id.
        document_id: String,
        /// Missing metadata key.
        field: &'static str,
    },

    /// Requested zero results.
    #[error("n_results must be >= 1")]
    InvalidLimit,
}

/// Convenience result type for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;
