use thiserror::Error;

use crate::embedding::RerankerError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scorer error: {0}")]
    Scorer(#[from] RerankerError),

    #[error("non-finite rerank score {score} for document {document_id}")]
    NonFiniteScore { document_id: String, score: f32 },
}
