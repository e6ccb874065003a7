use tracing::{debug, instrument, warn};

use super::error::{CacheError, CacheResult};
use super::record;
use super::types::{CacheEntry, CacheHit, CacheLookup};
use crate::constants::{DEFAULT_CACHE_THRESHOLD, DEFAULT_POLICY_NAME};
use crate::hashing::query_fingerprint;
use crate::model::SearchResult;
use crate::vectordb::{IndexHit, IndexRecord, VectorDbError, VectorIndex};

/// Semantic cache of answered queries.
///
/// The query text is both the cache key and the text embedded for similarity
/// search, so near-duplicate phrasings of a cached query also hit.
pub struct CacheTier<I> {
    index: I,
    threshold: f32,
    default_policy_name: String,
}

impl<I: std::fmt::Debug> std::fmt::Debug for CacheTier<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheTier")
            .field("index", &self.index)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl<I: VectorIndex> CacheTier<I> {
    /// Creates a tier hitting when the nearest cached query is within `threshold`.
    pub fn new(index: I, threshold: f32) -> Self {
        Self {
            index,
            threshold,
            default_policy_name: DEFAULT_POLICY_NAME.to_string(),
        }
    }

    /// Cache tier with the default threshold.
    pub fn with_default_threshold(index: I) -> Self {
        Self::new(index, DEFAULT_CACHE_THRESHOLD)
    }

    /// Policy name assigned to results decoded from flat records.
    pub fn with_default_policy_name(mut self, policy_name: impl Into<String>) -> Self {
        self.default_policy_name = policy_name.into();
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Closest cached query, if the cache holds anything.
    pub async fn nearest(&self, query: &str) -> CacheResult<Option<IndexHit>> {
        let mut hits = self.index.query(query, 1).await?;
        Ok(if hits.is_empty() {
            None
        } else {
            Some(hits.swap_remove(0))
        })
    }

    /// Probes the cache: a hit requires `distance <= threshold`.
    #[instrument(skip(self, query), fields(query = %query_fingerprint(query), threshold = self.threshold))]
    pub async fn lookup(&self, query: &str) -> CacheResult<CacheLookup> {
        let nearest = match self.nearest(query).await {
            Err(CacheError::IndexUnavailable(VectorDbError::MalformedPoint {
                point_id,
                distance,
                field,
            })) => return Ok(self.unreadable_nearest(distance, &point_id, field)),
            other => other?,
        };

        let Some(hit) = nearest else {
            debug!("Cache empty");
            return Ok(CacheLookup::Miss {
                nearest_distance: None,
            });
        };

        let within_threshold = hit.distance <= self.threshold;
        if !within_threshold {
            debug!(distance = hit.distance, "Nearest cached query outside threshold");
            return Ok(CacheLookup::Miss {
                nearest_distance: Some(hit.distance),
            });
        }

        match record::decode(&hit.metadata, &self.default_policy_name) {
            Ok(results) => {
                debug!(
                    distance = hit.distance,
                    results = results.len(),
                    "Cache hit"
                );
                Ok(CacheLookup::Hit(CacheHit {
                    entry: CacheEntry {
                        query: hit.text,
                        results,
                    },
                    distance: hit.distance,
                }))
            }
            Err(CacheError::CorruptRecord { reason }) => {
                warn!(
                    distance = hit.distance,
                    cached_query = %query_fingerprint(&hit.text),
                    reason = %reason,
                    "Corrupt cache record, treating as miss"
                );
                Ok(CacheLookup::Corrupt {
                    distance: hit.distance,
                    reason,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// The nearest cached point exists but cannot be read back as an entry.
    fn unreadable_nearest(&self, distance: f32, point_id: &str, field: &str) -> CacheLookup {
        if distance > self.threshold {
            return CacheLookup::Miss {
                nearest_distance: Some(distance),
            };
        }

        let reason = format!("cache point {point_id} is missing '{field}'");
        warn!(distance, reason = %reason, "Unreadable cache point, treating as miss");
        CacheLookup::Corrupt { distance, reason }
    }

    /// Stores raw results under `query`. Storing the same text again replaces the entry.
    #[instrument(skip(self, query, results), fields(query = %query_fingerprint(query), results = results.len()))]
    pub async fn store(&self, query: &str, results: &[SearchResult]) -> CacheResult<()> {
        let metadata = record::encode(results)?;

        let entry = IndexRecord {
            id: query.to_string(),
            text: query.to_string(),
            metadata,
        };

        self.index.add(vec![entry]).await?;
        debug!("Cache entry stored");
        Ok(())
    }
}
