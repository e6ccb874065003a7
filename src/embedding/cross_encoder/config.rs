use std::path::PathBuf;

use crate::constants::DEFAULT_CROSS_ENCODER_MAX_SEQ_LEN;

#[derive(Debug, Clone)]
pub struct CrossEncoderConfig {
    /// Model directory; `None` selects the lexical stub scorer.
    pub model_dir: Option<PathBuf>,

    /// Max tokens for the joint (query, passage) input.
    pub max_seq_len: usize,
}

impl Default for CrossEncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: DEFAULT_CROSS_ENCODER_MAX_SEQ_LEN,
        }
    }
}

impl CrossEncoderConfig {
    pub const ENV_MODEL_PATH: &'static str = "RAGCACHE_RERANKER_PATH";

    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len < 2 {
            return Err(format!(
                "max_seq_len must fit a query and a passage, got {}",
                self.max_seq_len
            ));
        }

        if let Some(ref path) = self.model_dir
            && path.as_os_str().is_empty()
        {
            return Err("model_dir cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_dir,
            ..Default::default()
        }
    }
}
