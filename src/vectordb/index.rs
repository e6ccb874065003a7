use std::future::Future;
use std::sync::Arc;

use half::f16;
use tracing::{debug, instrument};

use super::client::QdrantClient;
use super::error::VectorDbError;
use super::model::{IndexHit, IndexRecord, VectorPoint};
use super::WriteConsistency;
use crate::embedding::SentenceEmbedder;
use crate::hashing::point_id_for;

/// Text-level nearest-neighbour index: embeds on insert and on query.
///
/// `query` returns at most `k` hits ordered by ascending distance. Adding a
/// record whose id already exists replaces the stored record.
pub trait VectorIndex: Send + Sync {
    /// Collection or namespace name, for logs.
    fn name(&self) -> &str;

    fn add(
        &self,
        records: Vec<IndexRecord>,
    ) -> impl Future<Output = Result<(), VectorDbError>> + Send;

    fn query(
        &self,
        text: &str,
        k: u64,
    ) -> impl Future<Output = Result<Vec<IndexHit>, VectorDbError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, VectorDbError>> + Send;
}

impl<T: VectorIndex> VectorIndex for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn add(
        &self,
        records: Vec<IndexRecord>,
    ) -> impl Future<Output = Result<(), VectorDbError>> + Send {
        (**self).add(records)
    }

    fn query(
        &self,
        text: &str,
        k: u64,
    ) -> impl Future<Output = Result<Vec<IndexHit>, VectorDbError>> + Send {
        (**self).query(text, k)
    }

    fn count(&self) -> impl Future<Output = Result<u64, VectorDbError>> + Send {
        (**self).count()
    }
}

/// [`VectorIndex`] over one Qdrant collection.
#[derive(Debug, Clone)]
pub struct QdrantIndex {
    client: QdrantClient,
    collection: String,
    embedder: Arc<SentenceEmbedder>,
    consistency: WriteConsistency,
}

impl QdrantIndex {
    /// Writes default to [`WriteConsistency::Strong`] so a stored cache entry is
    /// visible to the next lookup.
    pub fn new(
        client: QdrantClient,
        collection: impl Into<String>,
        embedder: Arc<SentenceEmbedder>,
    ) -> Self {
        Self {
            client,
            collection: collection.into(),
            embedder,
            consistency: WriteConsistency::Strong,
        }
    }

    pub fn with_consistency(mut self, consistency: WriteConsistency) -> Self {
        self.consistency = consistency;
        self
    }

    /// Creates the collection sized to the embedder if it does not exist.
    pub async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        self.client
            .ensure_collection(&self.collection, self.embedder.embedding_dim() as u64)
            .await
    }

    pub fn client(&self) -> &QdrantClient {
        &self.client
    }

    fn embed_f32(&self, text: &str) -> Result<Vec<f32>, VectorDbError> {
        let embedding = self.embedder.embed(text)?;
        let expected = self.embedder.embedding_dim();
        if embedding.len() != expected {
            return Err(VectorDbError::InvalidDimension {
                expected,
                actual: embedding.len(),
            });
        }
        Ok(embedding.iter().map(|v: &f16| v.to_f32()).collect())
    }
}

impl VectorIndex for QdrantIndex {
    fn name(&self) -> &str {
        &self.collection
    }

    #[instrument(skip(self, records), fields(collection = %self.collection, records = records.len()))]
    async fn add(&self, records: Vec<IndexRecord>) -> Result<(), VectorDbError> {
        let points = records
            .iter()
            .map(|record| {
                Ok(VectorPoint {
                    id: point_id_for(&record.id),
                    vector: self.embed_f32(&record.text)?,
                    payload: record.to_payload(),
                })
            })
            .collect::<Result<Vec<_>, VectorDbError>>()?;

        self.client
            .upsert_points(&self.collection, points, self.consistency)
            .await
    }

    #[instrument(skip(self, text), fields(collection = %self.collection))]
    async fn query(&self, text: &str, k: u64) -> Result<Vec<IndexHit>, VectorDbError> {
        let vector = self.embed_f32(text)?;
        let hits = self.client.search(&self.collection, vector, k).await?;
        debug!(hits = hits.len(), "Qdrant search complete");
        Ok(hits)
    }

    async fn count(&self) -> Result<u64, VectorDbError> {
        self.client.count(&self.collection).await
    }
}
