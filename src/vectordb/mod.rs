//! Vector index abstraction and its Qdrant binding.

pub mod client;
pub mod error;
pub mod index;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::QdrantClient;
pub use error::VectorDbError;
pub use index::{QdrantIndex, VectorIndex};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorIndex;
pub use model::{IndexHit, IndexRecord, Metadata, MetadataValue, VectorPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait for the write to be indexed and searchable.
    /// Maps to `wait=true`.
    Strong,
    /// Return once the server acknowledges receipt; the write may not be
    /// searchable yet. Maps to `wait=false`.
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
