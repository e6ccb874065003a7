use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use half::f16;
use parking_lot::{Mutex, RwLock};

use crate::embedding::SentenceEmbedder;
use crate::embedding::sentence::squared_l2_distance;
use crate::vectordb::model::PAYLOAD_DOC_ID;
use crate::vectordb::{IndexHit, IndexRecord, Metadata, VectorDbError, VectorIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Query,
    Count,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Query => "query",
            Operation::Count => "count",
        }
    }
}

struct StoredPoint {
    id: String,
    text: String,
    vector: Vec<f16>,
    metadata: Metadata,
}

/// In-memory [`VectorIndex`] with brute-force search.
///
/// Distances use the same squared-L2-of-unit-vectors scale as the Qdrant
/// binding.
///
/// Records keep insertion order, so equal distances come back in insertion
/// order. Test hooks: a fixed reported distance, failure injection, hits that
/// read back without a record id, and call counters.
pub struct MockVectorIndex {
    name: String,
    embedder: Arc<SentenceEmbedder>,
    points: RwLock<Vec<StoredPoint>>,
    fixed_distance: Mutex<Option<f32>>,
    failing: AtomicBool,
    failing_writes: AtomicBool,
    malformed_hits: AtomicBool,
    add_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl MockVectorIndex {
    /// Empty index backed by a stub embedder.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_embedder(name, Arc::new(SentenceEmbedder::stub()))
    }

    pub fn with_embedder(name: impl Into<String>, embedder: Arc<SentenceEmbedder>) -> Self {
        Self {
            name: name.into(),
            embedder,
            points: RwLock::new(Vec::new()),
            fixed_distance: Mutex::new(None),
            failing: AtomicBool::new(false),
            failing_writes: AtomicBool::new(false),
            malformed_hits: AtomicBool::new(false),
            add_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Every hit reports `distance` instead of the computed one (ordering is unchanged).
    pub fn set_fixed_distance(&self, distance: Option<f32>) {
        *self.fixed_distance.lock() = distance;
    }

    /// When set, every operation fails as if the backend were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// When set, only `add` fails; reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    /// When set, a query with any hit fails as if the nearest stored point had
    /// lost its record id.
    pub fn set_malformed_hits(&self, malformed: bool) {
        self.malformed_hits.store(malformed, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Stored records in insertion order.
    pub fn records(&self) -> Vec<IndexRecord> {
        self.points
            .read()
            .iter()
            .map(|p| IndexRecord {
                id: p.id.clone(),
                text: p.text.clone(),
                metadata: p.metadata.clone(),
            })
            .collect()
    }

    fn check_available(&self, operation: Operation) -> Result<(), VectorDbError> {
        let write_blocked =
            operation == Operation::Add && self.failing_writes.load(Ordering::SeqCst);
        if !self.failing.load(Ordering::SeqCst) && !write_blocked {
            return Ok(());
        }

        let collection = self.name.clone();
        let message = format!("injected failure during {}", operation.as_str());
        Err(match operation {
            Operation::Add => VectorDbError::UpsertFailed {
                collection,
                message,
            },
            Operation::Query => VectorDbError::SearchFailed {
                collection,
                message,
            },
            Operation::Count => VectorDbError::CountFailed {
                collection,
                message,
            },
        })
    }
}

impl VectorIndex for MockVectorIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add(&self, records: Vec<IndexRecord>) -> Result<(), VectorDbError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(Operation::Add)?;

        let embedded = records
            .into_iter()
            .map(|record| {
                let vector = self.embedder.embed(&record.text)?;
                Ok(StoredPoint {
                    id: record.id,
                    text: record.text,
                    vector,
                    metadata: record.metadata,
                })
            })
            .collect::<Result<Vec<_>, VectorDbError>>()?;

        let mut points = self.points.write();
        for point in embedded {
            match points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => points.push(point),
            }
        }

        Ok(())
    }

    async fn query(&self, text: &str, k: u64) -> Result<Vec<IndexHit>, VectorDbError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(Operation::Query)?;

        let query = self.embedder.embed(text)?;
        let fixed = *self.fixed_distance.lock();

        let points = self.points.read();
        let mut scored: Vec<(f32, &StoredPoint)> = points
            .iter()
            .map(|p| (squared_l2_distance(&query, &p.vector), p))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        if self.malformed_hits.load(Ordering::SeqCst) {
            if let Some((distance, nearest)) = scored.first() {
                return Err(VectorDbError::MalformedPoint {
                    point_id: nearest.id.clone(),
                    distance: fixed.unwrap_or(*distance),
                    field: PAYLOAD_DOC_ID,
                });
            }
        }

        Ok(scored
            .into_iter()
            .take(usize::try_from(k).unwrap_or(usize::MAX))
            .map(|(distance, p)| IndexHit {
                id: p.id.clone(),
                text: p.text.clone(),
                distance: fixed.unwrap_or(distance),
                metadata: p.metadata.clone(),
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, VectorDbError> {
        self.check_available(Operation::Count)?;
        Ok(self.points.read().len() as u64)
    }
}
