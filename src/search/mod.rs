//! Cache-first search orchestration.
//!
//! ```text
//! query ─► cache lookup ─┬─ hit ───────────────────────────┐
//!                        └─ miss ─► main index ─► store ───┤
//!                                                          ▼
//!                                              rerank ─► top k
//! ```

pub mod error;
pub mod pipeline;
pub mod types;


pub use error::SearchError;
pub use pipeline::SearchPipeline;
pub use types::{HealthStatus, IndexStats, SearchConfig, SearchOutcome};
