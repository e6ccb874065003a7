//! Cross-encoder reranking of retrieved passages.
//!
//! Every request is reranked, whether its results came from the cache or the
//! main index. A [`Reranker`] scores each `(query, passage)` pair through a
//! [`PassageScorer`] and orders results by descending score. Equal scores keep
//! their retrieval order.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scorer;


pub use error::ScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::FixedScorer;
pub use scorer::{PassageScorer, Reranker};
