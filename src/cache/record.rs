//! Persisted form of cached results.
//!
//! Records are written as one versioned JSON document under [`CACHE_RECORD_KEY`].
//! Older deployments wrote index-suffixed flat fields instead:
//!
//! | key             | value                             |
//! |-----------------|-----------------------------------|
//! | `ids{N}`        | document id                       |
//! | `documents{N}`  | passage text                      |
//! | `distances{N}`  | distance (number or decimal text) |
//! | `metadatas{N}`  | page label                        |
//!
//! Flat records are still decoded (read-only). They carry no policy name, so
//! the caller supplies one. Decoding stops at the first missing `ids{N}`.

use serde::{Deserialize, Serialize};

use super::error::{CacheError, CacheResult};
use crate::model::{DocumentMetadata, SearchResult};
use crate::vectordb::{Metadata, MetadataValue};

/// Metadata key holding the structured record.
pub const CACHE_RECORD_KEY: &str = "cache_record";

/// Version written by [`encode`].
pub const CACHE_RECORD_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredResult {
    document_id: String,
    content: String,
    distance: f32,
    policy_name: String,
    page_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    version: u32,
    stored_at: i64,
    results: Vec<StoredResult>,
}

/// Encodes results as cache-entry metadata. Rerank scores are not persisted.
pub fn encode(results: &[SearchResult]) -> CacheResult<Metadata> {
    if let Some(bad) = results.iter().find(|r| !r.distance.is_finite()) {
        return Err(CacheError::EncodeFailed {
            reason: format!(
                "non-finite distance {} for document {}",
                bad.distance, bad.document_id
            ),
        });
    }

    let record = CacheRecord {
        version: CACHE_RECORD_VERSION,
        stored_at: chrono::Utc::now().timestamp(),
        results: results
            .iter()
            .map(|r| StoredResult {
                document_id: r.document_id.clone(),
                content: r.content.clone(),
                distance: r.distance,
                policy_name: r.metadata.policy_name.clone(),
                page_label: r.metadata.page_label.clone(),
            })
            .collect(),
    };

    let json = serde_json::to_string(&record).map_err(|e| CacheError::EncodeFailed {
        reason: e.to_string(),
    })?;

    let mut metadata = Metadata::new();
    metadata.insert(CACHE_RECORD_KEY.to_string(), MetadataValue::Str(json));
    Ok(metadata)
}

/// Decodes cache-entry metadata into unranked results.
///
/// `default_policy_name` is only used for flat records.
pub fn decode(metadata: &Metadata, default_policy_name: &str) -> CacheResult<Vec<SearchResult>> {
    match metadata.get(CACHE_RECORD_KEY) {
        Some(value) => decode_structured(value),
        None => decode_flat(metadata, default_policy_name),
    }
}

fn corrupt(reason: impl Into<String>) -> CacheError {
    CacheError::CorruptRecord {
        reason: reason.into(),
    }
}

fn decode_structured(value: &MetadataValue) -> CacheResult<Vec<SearchResult>> {
    let json = value
        .as_str()
        .ok_or_else(|| corrupt(format!("{CACHE_RECORD_KEY} is not a string")))?;

    let record: CacheRecord =
        serde_json::from_str(json).map_err(|e| corrupt(format!("malformed record: {e}")))?;

    if record.version != CACHE_RECORD_VERSION {
        return Err(corrupt(format!(
            "unsupported record version {}",
            record.version
        )));
    }

    Ok(record
        .results
        .into_iter()
        .map(|r| {
            SearchResult::new(
                r.document_id,
                r.content,
                r.distance,
                DocumentMetadata::new(r.policy_name, r.page_label),
            )
        })
        .collect())
}

fn decode_flat(metadata: &Metadata, policy_name: &str) -> CacheResult<Vec<SearchResult>> {
    let mut results = Vec::new();

    for n in 0usize.. {
        let Some(id) = metadata.get(&format!("ids{n}")) else {
            break;
        };

        let field = |prefix: &str| {
            metadata
                .get(&format!("{prefix}{n}"))
                .ok_or_else(|| corrupt(format!("entry {n} has ids{n} but no {prefix}{n}")))
        };

        let content = field("documents")?;
        let distance = field("distances")?
            .as_f64()
            .map(|d| d as f32)
            .filter(|d| d.is_finite())
            .ok_or_else(|| corrupt(format!("distances{n} is not a finite number")))?;
        let page_label = field("metadatas")?;

        results.push(SearchResult::new(
            id.to_string(),
            content.to_string(),
            distance,
            DocumentMetadata::new(policy_name, page_label.to_string()),
        ));
    }

    Ok(results)
}
