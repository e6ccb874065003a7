//! Cache-augmented semantic retrieval (used by the CLI and integration tests).
//!
//! A query is answered from a semantic cache of earlier queries when one lies
//! close enough in embedding space, otherwise from the main document index.
//! Either way the candidates are reranked by a cross-encoder and cut to the
//! configured top k, and the surviving pages are cited by policy name and page
//! label.
//!
//! ## Layout
//! - [`search`]: [`SearchPipeline`], the cache-first orchestrator
//! - [`cache`]: [`CacheTier`] and the persisted cache record format
//! - [`retrieval`]: [`RetrievalTier`] over the main index
//! - [`scoring`]: [`Reranker`] and the [`PassageScorer`] seam
//! - [`citation`]: per-policy page citations
//! - [`vectordb`]: the [`VectorIndex`] trait and its Qdrant binding
//! - [`embedding`]: candle BERT sentence embedder and cross-encoder
//! - [`ingest`]: loading document pages into the main index
//! - [`config`]: environment configuration
//!
//! ## Test/Mock Support
//! [`vectordb::MockVectorIndex`] and [`scoring::FixedScorer`] are available
//! behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod citation;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod ingest;
pub mod model;
pub mod retrieval;
pub mod scoring;
pub mod search;
pub mod vectordb;

pub use cache::{CacheEntry, CacheError, CacheHit, CacheLookup, CacheStatus, CacheTier};
pub use citation::{Citation, extract_citations};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    CrossEncoder, CrossEncoderConfig, EmbedderConfig, EmbeddingError, RerankerError,
    SentenceEmbedder,
};
pub use hashing::{point_id_for, query_fingerprint};
pub use ingest::{IngestConfig, IngestError, IngestReport, Page, ingest, load_pages};
pub use model::{DocumentMetadata, SearchResult};
pub use retrieval::{RetrievalError, RetrievalTier};
pub use scoring::{PassageScorer, Reranker, ScoringError};
pub use search::{HealthStatus, IndexStats, SearchConfig, SearchError, SearchOutcome, SearchPipeline};
pub use vectordb::{
    IndexHit, IndexRecord, Metadata, MetadataValue, QdrantClient, QdrantIndex, VectorDbError,
    VectorIndex, WriteConsistency,
};

#[cfg(any(test, feature = "mock"))]
pub use scoring::FixedScorer;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
