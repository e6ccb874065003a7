use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::embedding::RerankerError;

use super::scorer::PassageScorer;

/// Deterministic scorer keyed by passage text.
///
/// Unknown passages score `default_score`. Failure injection makes every call
/// return [`RerankerError::InferenceFailed`].
#[derive(Debug, Default)]
pub struct FixedScorer {
    scores: HashMap<String, f32>,
    default_score: f32,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FixedScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, passage: impl Into<String>, score: f32) -> Self {
        self.scores.insert(passage.into(), score);
        self
    }

    pub fn with_default_score(mut self, score: f32) -> Self {
        self.default_score = score;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PassageScorer for FixedScorer {
    fn score(&self, _query: &str, passage: &str) -> Result<f32, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RerankerError::InferenceFailed {
                reason: "injected scorer failure".to_string(),
            });
        }
        Ok(self
            .scores
            .get(passage)
            .copied()
            .unwrap_or(self.default_score))
    }
}
