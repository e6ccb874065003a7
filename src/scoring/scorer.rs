use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::embedding::{CrossEncoder, RerankerError};
use crate::model::SearchResult;

use super::error::ScoringError;

/// Relevance of a passage to a query; higher is more relevant.
pub trait PassageScorer: Send + Sync {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError>;
}

impl PassageScorer for CrossEncoder {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        CrossEncoder::score(self, query, passage)
    }
}

impl<S: PassageScorer + ?Sized> PassageScorer for &S {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        (**self).score(query, passage)
    }
}

impl<S: PassageScorer + ?Sized> PassageScorer for Arc<S> {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        (**self).score(query, passage)
    }
}

pub struct Reranker<S> {
    scorer: S,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Reranker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("scorer", &self.scorer)
            .finish()
    }
}

impl<S: PassageScorer> Reranker<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Scores every result and sorts by descending `rerank_score`.
    ///
    /// Fails as a whole if any pair fails to score or scores NaN/infinite.
    pub fn rerank(
        &self,
        query: &str,
        results: Vec<SearchResult>,
    ) -> Result<Vec<SearchResult>, ScoringError> {
        if results.is_empty() {
            return Ok(results);
        }

        let mut scored = results
            .into_iter()
            .map(|result| {
                let score = self.scorer.score(query, &result.content)?;
                if !score.is_finite() {
                    return Err(ScoringError::NonFiniteScore {
                        document_id: result.document_id,
                        score,
                    });
                }
                Ok(result.with_rerank_score(score))
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        // Scores are finite here. Ties (including -0.0 vs 0.0) keep input order.
        scored.sort_by(|a, b| {
            b.rerank_score
                .partial_cmp(&a.rerank_score)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            candidates = scored.len(),
            top_score = scored.first().map(|r| r.rerank_score),
            "Reranking complete"
        );

        Ok(scored)
    }

    /// [`rerank`](Self::rerank) then keep the best `top_k`.
    pub fn rerank_top_k(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, ScoringError> {
        let mut ranked = self.rerank(query, results)?;
        ranked.truncate(top_k);
        Ok(ranked)
    }
}
