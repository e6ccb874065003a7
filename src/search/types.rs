use crate::cache::CacheStatus;
use crate::citation::{Citation, extract_citations};
use crate::constants::{DEFAULT_RERANK_TOP_K, DEFAULT_SEARCH_RESULTS_LIMIT};
use crate::model::SearchResult;

/// Per-pipeline search policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Neighbours fetched from the main index when the caller gives no limit.
    pub search_results_limit: usize,
    /// Results kept after reranking.
    pub rerank_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_results_limit: DEFAULT_SEARCH_RESULTS_LIMIT,
            rerank_top_k: DEFAULT_RERANK_TOP_K,
        }
    }
}

/// Reranked results of one request and how they were served.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// At most `rerank_top_k` results, best first.
    pub results: Vec<SearchResult>,
    pub status: CacheStatus,
}

impl SearchOutcome {
    #[inline]
    pub fn from_cache(&self) -> bool {
        self.status.is_hit()
    }

    pub fn citations(&self) -> Vec<Citation> {
        extract_citations(&self.results)
    }
}

/// Document counts of both indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub main_documents: u64,
    pub cache_entries: u64,
}

/// Readiness of the main index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Ready { documents: u64 },
    /// Reachable but nothing ingested yet.
    Empty,
    Unavailable { reason: String },
}

impl HealthStatus {
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, HealthStatus::Ready { .. })
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Ready { documents } => write!(f, "ready ({documents} documents)"),
            HealthStatus::Empty => f.write_str("empty"),
            HealthStatus::Unavailable { reason } => write!(f, "unavailable: {reason}"),
        }
    }
}
