use tracing::{debug, info, instrument, warn};

use super::error::SearchError;
use super::types::{HealthStatus, IndexStats, SearchConfig, SearchOutcome};
use crate::cache::{CacheLookup, CacheTier};
use crate::hashing::query_fingerprint;
use crate::model::SearchResult;
use crate::retrieval::RetrievalTier;
use crate::scoring::{PassageScorer, Reranker};
use crate::vectordb::VectorIndex;

/// Cache-first search over a main index `M` and a cache index `C`, reranked by `S`.
///
/// Holds no per-request state; share one instance behind an `Arc`.
pub struct SearchPipeline<M, C, S> {
    retrieval: RetrievalTier<M>,
    cache: CacheTier<C>,
    reranker: Reranker<S>,
    config: SearchConfig,
}

impl<M, C, S> std::fmt::Debug for SearchPipeline<M, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M, C, S> SearchPipeline<M, C, S>
where
    M: VectorIndex,
    C: VectorIndex,
    S: PassageScorer,
{
    pub fn new(
        retrieval: RetrievalTier<M>,
        cache: CacheTier<C>,
        reranker: Reranker<S>,
        config: SearchConfig,
    ) -> Self {
        Self {
            retrieval,
            cache,
            reranker,
            config,
        }
    }

    /// Answers `query` from the cache when a close enough query was seen before,
    /// otherwise from the main index (caching the raw results). Results are always
    /// reranked and cut to `rerank_top_k`.
    ///
    /// `n_results` bounds the main-index search and defaults to
    /// `search_results_limit`.
    #[instrument(skip(self, query), fields(query = %query_fingerprint(query)))]
    pub async fn search(
        &self,
        query: &str,
        n_results: Option<usize>,
    ) -> Result<SearchOutcome, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidRequest {
                reason: "query text is empty".to_string(),
            });
        }

        let n_results = n_results.unwrap_or(self.config.search_results_limit);
        if n_results == 0 {
            return Err(SearchError::InvalidRequest {
                reason: "n_results must be >= 1".to_string(),
            });
        }

        let lookup = self.cache.lookup(query).await?;
        let status = lookup.status();

        let candidates = match lookup {
            CacheLookup::Hit(hit) => hit.entry.results,
            CacheLookup::Miss { .. } | CacheLookup::Corrupt { .. } => {
                let results = self.retrieval.search(query, n_results).await?;
                self.populate(query, &results).await;
                results
            }
        };

        let mut results = self.reranker.rerank(query, candidates)?;
        results.truncate(self.config.rerank_top_k);

        info!(
            status = %status,
            results = results.len(),
            top_score = results.first().map(|r| r.rerank_score),
            "Search complete"
        );

        Ok(SearchOutcome { results, status })
    }

    /// [`search`](Self::search) with the default result limit.
    pub async fn search_default(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        self.search(query, None).await
    }

    /// Best-effort cache write: the retrieved results are valid either way.
    async fn populate(&self, query: &str, results: &[SearchResult]) {
        if results.is_empty() {
            debug!("No results retrieved, skipping cache populate");
            return;
        }

        if let Err(e) = self.cache.store(query, results).await {
            warn!(error = %e, "Failed to populate cache");
        }
    }

    pub async fn stats(&self) -> Result<IndexStats, SearchError> {
        let main_documents = self.retrieval.index().count().await?;
        let cache_entries = self.cache.index().count().await?;
        Ok(IndexStats {
            main_documents,
            cache_entries,
        })
    }

    pub async fn health(&self) -> HealthStatus {
        match self.retrieval.index().count().await {
            Ok(0) => HealthStatus::Empty,
            Ok(documents) => HealthStatus::Ready { documents },
            Err(e) => HealthStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheTier<C> {
        &self.cache
    }

    pub fn retrieval(&self) -> &RetrievalTier<M> {
        &self.retrieval
    }

    pub fn reranker(&self) -> &Reranker<S> {
        &self.reranker
    }
}
