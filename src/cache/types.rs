use crate::model::SearchResult;

/// A previously answered query and its pre-rerank results.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// A cache entry within the hit threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub entry: CacheEntry,
    /// Distance between the request query and the cached query.
    pub distance: f32,
}

/// Outcome of a cache lookup. Index failures are reported separately as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// No neighbour within the threshold (`None` when the cache is empty).
    Miss { nearest_distance: Option<f32> },
    Hit(CacheHit),
    /// A neighbour was within the threshold but its record could not be decoded.
    Corrupt { distance: f32, reason: String },
}

impl CacheLookup {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn status(&self) -> CacheStatus {
        match self {
            CacheLookup::Miss { .. } => CacheStatus::Miss,
            CacheLookup::Hit(_) => CacheStatus::Hit,
            CacheLookup::Corrupt { .. } => CacheStatus::CorruptRecord,
        }
    }
}

/// How a search request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// A matching record was unreadable; served as a miss.
    CorruptRecord,
}

impl CacheStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::CorruptRecord => "CORRUPT_RECORD",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
