//! Semantic cache tier.
//!
//! Answered queries are stored in their own vector index with their raw
//! retrieval results. A later query whose nearest cached query lies within the
//! distance threshold is served from the cache.

pub mod error;
pub mod record;
pub mod tier;
pub mod types;


pub use error::{CacheError, CacheResult};
pub use record::{CACHE_RECORD_KEY, CACHE_RECORD_VERSION};
pub use tier::CacheTier;
pub use types::{CacheEntry, CacheHit, CacheLookup, CacheStatus};
