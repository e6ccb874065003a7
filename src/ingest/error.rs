use std::path::PathBuf;

use crate::vectordb::VectorDbError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned while loading or ingesting pages.
pub enum IngestError {
    /// The main index could not be counted or written.
    #[error("main index unavailable: {0}")]
    Index(#[from] VectorDbError),

    /// The pages file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pages file is not a JSON array of pages.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid ingest config: {reason}")]
    InvalidConfig { reason: String },
}

/// Convenience result type for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;
