//! Passage types shared by the cache, retrieval and reranking tiers.

use serde::{Deserialize, Serialize};

use crate::constants::UNRANKED_SCORE;

/// Provenance of a passage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub policy_name: String,
    pub page_label: String,
}

impl DocumentMetadata {
    pub fn new(policy_name: impl Into<String>, page_label: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            page_label: page_label.into(),
        }
    }
}

/// A retrieved passage.
///
/// `distance` is the raw index distance (lower is closer) and never changes after
/// retrieval. `rerank_score` is [`UNRANKED_SCORE`] until the reranker assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document_id: String,
    pub content: String,
    pub distance: f32,
    pub rerank_score: f32,
    pub metadata: DocumentMetadata,
}

impl SearchResult {
    /// Creates an unranked result.
    pub fn new(
        document_id: impl Into<String>,
        content: impl Into<String>,
        distance: f32,
        metadata: DocumentMetadata,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            content: content.into(),
            distance,
            rerank_score: UNRANKED_SCORE,
            metadata,
        }
    }

    pub fn with_rerank_score(mut self, score: f32) -> Self {
        self.rerank_score = score;
        self
    }
}
