use std::collections::{BTreeMap, HashMap};
use std::fmt;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{PointId, ScoredPoint, Value};
use serde::{Deserialize, Serialize};

use super::error::VectorDbError;
use crate::embedding::sentence::distance_from_similarity;

/// Payload key holding the record id.
pub const PAYLOAD_DOC_ID: &str = "doc_id";
/// Payload key holding the embedded text.
pub const PAYLOAD_TEXT: &str = "text";

/// Flat scalar metadata attached to an index record.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; decimal strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<MetadataValue> for Value {
    fn from(v: MetadataValue) -> Self {
        match v {
            MetadataValue::Bool(b) => b.into(),
            MetadataValue::Int(i) => i.into(),
            MetadataValue::Float(f) => f.into(),
            MetadataValue::Str(s) => s.into(),
        }
    }
}

/// Converts a Qdrant payload value; lists, structs and nulls have no scalar form.
fn metadata_from_value(value: &Value) -> Option<MetadataValue> {
    if let Some(s) = value.as_str() {
        return Some(MetadataValue::Str(s.clone()));
    }
    if let Some(i) = value.as_integer() {
        return Some(MetadataValue::Int(i));
    }
    if let Some(f) = value.as_double() {
        return Some(MetadataValue::Float(f));
    }
    value.as_bool().map(MetadataValue::Bool)
}

/// A document to embed and insert.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

impl IndexRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Qdrant payload: `doc_id`, `text` and every metadata entry.
    pub fn to_payload(&self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = self
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect();
        payload.insert(PAYLOAD_DOC_ID.to_string(), self.id.clone().into());
        payload.insert(PAYLOAD_TEXT.to_string(), self.text.clone().into());
        payload
    }
}

/// A nearest-neighbour result. Lower `distance` is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub text: String,
    pub distance: f32,
    pub metadata: Metadata,
}

impl IndexHit {
    /// Builds a hit from a cosine-scored Qdrant point.
    ///
    /// The score is converted to squared L2 distance between unit vectors
    /// (`2 · (1 - score)`). A payload without a string `doc_id` is
    /// [`VectorDbError::MalformedPoint`].
    pub fn from_scored_point(point: ScoredPoint) -> Result<Self, VectorDbError> {
        let distance = distance_from_similarity(point.score);
        let mut payload = point.payload;

        let Some(id) = payload
            .remove(PAYLOAD_DOC_ID)
            .and_then(|v| v.as_str().cloned())
        else {
            return Err(VectorDbError::MalformedPoint {
                point_id: point_id_label(point.id.as_ref()),
                distance,
                field: PAYLOAD_DOC_ID,
            });
        };
        let text = payload
            .remove(PAYLOAD_TEXT)
            .and_then(|v| v.as_str().cloned())
            .unwrap_or_default();

        let metadata = payload
            .iter()
            .filter_map(|(k, v)| metadata_from_value(v).map(|m| (k.clone(), m)))
            .collect();

        Ok(Self {
            id,
            text,
            distance,
            metadata,
        })
    }
}

fn point_id_label(id: Option<&PointId>) -> String {
    match id.and_then(|id| id.point_id_options.as_ref()) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(uuid)) => uuid.clone(),
        None => "<unknown>".to_string(),
    }
}

/// A point ready for upsert.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, Value>,
}
