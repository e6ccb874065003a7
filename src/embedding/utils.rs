use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

use super::bert::TOKENIZER_FILE;
use super::error::EmbeddingError;

/// Loads `tokenizer.json` from a model directory with truncation at `max_len` tokens.
///
/// For sentence pairs the longest member is truncated first, so a long passage
/// never pushes the query out of a cross-encoder input.
pub fn load_tokenizer(model_dir: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let path = if model_dir.is_dir() {
        model_dir.join(TOKENIZER_FILE)
    } else {
        model_dir.to_path_buf()
    };

    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to load tokenizer from {}: {}", path.display(), e),
        })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}
