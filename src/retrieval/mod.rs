//! Retrieval tier: nearest-neighbour search over the main document index.

pub mod error;


pub use error::{RetrievalError, RetrievalResult};

use tracing::{debug, instrument};

use crate::hashing::query_fingerprint;
use crate::model::{DocumentMetadata, SearchResult};
use crate::vectordb::{IndexHit, VectorDbError, VectorIndex};

/// Metadata key carrying a passage's policy name.
pub const POLICY_NAME_KEY: &str = "policy_name";
/// Metadata key carrying a passage's page label.
pub const PAGE_LABEL_KEY: &str = "page_label";

#[derive(Debug)]
pub struct RetrievalTier<I> {
    index: I,
}

impl<I: VectorIndex> RetrievalTier<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Returns up to `n_results` unranked results, closest first.
    #[instrument(skip(self, query), fields(query = %query_fingerprint(query), index = self.index.name()))]
    pub async fn search(&self, query: &str, n_results: usize) -> RetrievalResult<Vec<SearchResult>> {
        if n_results == 0 {
            return Err(RetrievalError::InvalidLimit);
        }

        let hits = match self.index.query(query, n_results as u64).await {
            Err(VectorDbError::MalformedPoint {
                point_id, field, ..
            }) => {
                return Err(RetrievalError::MalformedHit {
                    document_id: point_id,
                    field,
                });
            }
            other => other?,
        };
        let results = hits
            .into_iter()
            .map(to_search_result)
            .collect::<RetrievalResult<Vec<_>>>()?;

        debug!(results = results.len(), "Main index search complete");
        Ok(results)
    }
}

fn to_search_result(hit: IndexHit) -> RetrievalResult<SearchResult> {
    let field = |key: &'static str| {
        hit.metadata
            .get(key)
            .map(|v| v.to_string())
            .ok_or_else(|| RetrievalError::MalformedHit {
                document_id: hit.id.clone(),
                field: key,
            })
    };

    let metadata = DocumentMetadata::new(field(POLICY_NAME_KEY)?, field(PAGE_LABEL_KEY)?);
    Ok(SearchResult::new(hit.id, hit.text, hit.distance, metadata))
}
