//! Model wrappers: sentence embeddings for the vector indices and the
//! cross-encoder used by [`crate::scoring`].
//!
//! Both run BERT-family checkpoints through candle. Without model files both
//! fall back to deterministic stub modes suitable for tests and local runs.

/// BERT loading shared by both models.
pub mod bert;
/// Cross-encoder passage scorer.
pub mod cross_encoder;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

pub use cross_encoder::{CrossEncoder, CrossEncoderConfig, RerankerError};
pub use error::EmbeddingError;
pub use sentence::{EmbedderConfig, SentenceEmbedder};
