//! Loads document pages into the main index.
//!
//! Short pages (cover sheets, blank pages, headers) are dropped, the rest get
//! sequential ids and `{policy_name, page_label}` metadata. Ingestion is a
//! one-shot: an index that already holds documents is left untouched.

pub mod error;


use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::retrieval::{PAGE_LABEL_KEY, POLICY_NAME_KEY};
use crate::vectordb::{IndexRecord, VectorIndex};

pub use error::{IngestError, IngestResult};

/// Pages with fewer whitespace-separated words are skipped.
pub const DEFAULT_MIN_WORDS: usize = 10;

/// Records per `add` call.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// One page of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_label: String,
    pub text: String,
}

impl Page {
    pub fn new(page_label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            page_label: page_label.into(),
            text: text.into(),
        }
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub min_words: usize,
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl IngestConfig {
    pub fn min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> IngestResult<()> {
        if self.batch_size == 0 {
            return Err(IngestError::InvalidConfig {
                reason: "batch_size must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// What an ingestion run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub pages_seen: usize,
    /// Dropped for being too short.
    pub pages_filtered: usize,
    pub pages_added: usize,
    /// The index already held documents, nothing was written.
    pub skipped_existing: bool,
}

/// Reads `[{"page_label": ..., "text": ...}, ...]` from `path`.
pub fn load_pages(path: &Path) -> IngestResult<Vec<Page>> {
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Adds `pages` to `index` under `policy_name`, unless the index is already populated.
#[instrument(skip(index, pages), fields(index = index.name(), pages = pages.len()))]
pub async fn ingest<I: VectorIndex>(
    index: &I,
    pages: Vec<Page>,
    policy_name: &str,
    config: IngestConfig,
) -> IngestResult<IngestReport> {
    config.validate()?;

    let pages_seen = pages.len();
    let existing = index.count().await?;
    if existing > 0 {
        info!(existing, "Index already populated, skipping ingestion");
        return Ok(IngestReport {
            pages_seen,
            skipped_existing: true,
            ..IngestReport::default()
        });
    }

    let records: Vec<IndexRecord> = pages
        .into_iter()
        .filter(|page| page.word_count() >= config.min_words)
        .enumerate()
        .map(|(i, page)| {
            IndexRecord::new(i.to_string(), page.text)
                .with_metadata(POLICY_NAME_KEY, policy_name)
                .with_metadata(PAGE_LABEL_KEY, page.page_label)
        })
        .collect();

    let pages_added = records.len();
    let mut remaining = records.into_iter().peekable();
    while remaining.peek().is_some() {
        let batch: Vec<IndexRecord> = remaining.by_ref().take(config.batch_size).collect();
        debug!(batch = batch.len(), "Adding batch");
        index.add(batch).await?;
    }

    let report = IngestReport {
        pages_seen,
        pages_filtered: pages_seen - pages_added,
        pages_added,
        skipped_existing: false,
    };
    info!(
        added = report.pages_added,
        filtered = report.pages_filtered,
        "Ingestion complete"
    );
    Ok(report)
}
