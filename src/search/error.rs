use thiserror::Error;

use crate::cache::CacheError;
use crate::retrieval::RetrievalError;
use crate::scoring::ScoringError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by the search pipeline.
pub enum SearchError {
    /// Rejected before touching any index.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected.
        reason: String,
    },

    /// The cache could not be queried.
    #[error("cache lookup failed: {0}")]
    CacheLookup(#[from] CacheError),

    /// The main index search failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Reranking failed.
    #[error("rerank failed: {0}")]
    Rerank(#[from] ScoringError),

    /// An index could not be counted.
    #[error("index unavailable: {0}")]
    IndexUnavailable(#[from] VectorDbError),
}
