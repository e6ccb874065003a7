//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAGCACHE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CACHE_COLLECTION, DEFAULT_CACHE_THRESHOLD, DEFAULT_EMBEDDING_DIM,
    DEFAULT_MAIN_COLLECTION, DEFAULT_POLICY_NAME, DEFAULT_RERANK_TOP_K,
    DEFAULT_SEARCH_RESULTS_LIMIT,
};
use crate::search::SearchConfig;

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGCACHE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Collection holding the embedded corpus pages.
    pub main_collection: String,

    /// Collection holding previously answered queries.
    pub cache_collection: String,

    /// Neighbours fetched from the main index when the caller gives no limit. Default: `10`.
    pub search_results_limit: usize,

    /// Results kept after reranking. Default: `3`.
    pub rerank_top_k: usize,

    /// Distance ceiling for a cache hit. Default: `0.2`.
    ///
    /// Measured as squared L2 between unit embeddings, `2 * (1 - cos)`, so
    /// `0.2` admits neighbours with cosine similarity of at least `0.9`.
    pub cache_threshold: f32,

    /// Sentence-embedding model directory (BERT safetensors + tokenizer).
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder model directory (BERT classifier + tokenizer).
    pub reranker_path: Option<PathBuf>,

    /// Output dimension of the sentence embedder. Default: `384`.
    pub embedding_dim: usize,

    /// Policy name assumed when decoding legacy cache records.
    pub default_policy_name: String,
}

/// Default Qdrant URL used when `RAGCACHE_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            main_collection: DEFAULT_MAIN_COLLECTION.to_string(),
            cache_collection: DEFAULT_CACHE_COLLECTION.to_string(),
            search_results_limit: DEFAULT_SEARCH_RESULTS_LIMIT,
            rerank_top_k: DEFAULT_RERANK_TOP_K,
            cache_threshold: DEFAULT_CACHE_THRESHOLD,
            embedder_path: None,
            reranker_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            default_policy_name: DEFAULT_POLICY_NAME.to_string(),
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "RAGCACHE_QDRANT_URL";
    const ENV_MAIN_COLLECTION: &'static str = "RAGCACHE_MAIN_COLLECTION";
    const ENV_CACHE_COLLECTION: &'static str = "RAGCACHE_CACHE_COLLECTION";
    const ENV_SEARCH_RESULTS_LIMIT: &'static str = "RAGCACHE_SEARCH_RESULTS_LIMIT";
    const ENV_RERANK_TOP_K: &'static str = "RAGCACHE_RERANK_TOP_K";
    const ENV_CACHE_THRESHOLD: &'static str = "RAGCACHE_CACHE_THRESHOLD";
    const ENV_EMBEDDER_PATH: &'static str = "RAGCACHE_EMBEDDER_PATH";
    const ENV_RERANKER_PATH: &'static str = "RAGCACHE_RERANKER_PATH";
    const ENV_EMBEDDING_DIM: &'static str = "RAGCACHE_EMBEDDING_DIM";
    const ENV_DEFAULT_POLICY_NAME: &'static str = "RAGCACHE_DEFAULT_POLICY_NAME";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            main_collection: Self::parse_string_from_env(
                Self::ENV_MAIN_COLLECTION,
                defaults.main_collection,
            ),
            cache_collection: Self::parse_string_from_env(
                Self::ENV_CACHE_COLLECTION,
                defaults.cache_collection,
            ),
            search_results_limit: Self::parse_number_from_env(
                Self::ENV_SEARCH_RESULTS_LIMIT,
                defaults.search_results_limit,
            )?,
            rerank_top_k: Self::parse_number_from_env(
                Self::ENV_RERANK_TOP_K,
                defaults.rerank_top_k,
            )?,
            cache_threshold: Self::parse_number_from_env(
                Self::ENV_CACHE_THRESHOLD,
                defaults.cache_threshold,
            )?,
            embedder_path: Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH),
            reranker_path: Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH),
            embedding_dim: Self::parse_number_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            )?,
            default_policy_name: Self::parse_string_from_env(
                Self::ENV_DEFAULT_POLICY_NAME,
                defaults.default_policy_name,
            ),
        })
    }

    /// Validates ranges, collection names and model paths (does not load models).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_results_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SEARCH_RESULTS_LIMIT,
                reason: "must be > 0".to_string(),
            });
        }

        if self.rerank_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RERANK_TOP_K,
                reason: "must be > 0".to_string(),
            });
        }

        if self.rerank_top_k > self.search_results_limit {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RERANK_TOP_K,
                reason: format!(
                    "rerank_top_k ({}) cannot be greater than search_results_limit ({})",
                    self.rerank_top_k, self.search_results_limit
                ),
            });
        }

        if !self.cache_threshold.is_finite() || self.cache_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_THRESHOLD,
                reason: format!("must be a finite value >= 0, got {}", self.cache_threshold),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be > 0".to_string(),
            });
        }

        if self.main_collection.trim().is_empty() || self.cache_collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAIN_COLLECTION,
                reason: "collection names cannot be empty".to_string(),
            });
        }

        if self.main_collection == self.cache_collection {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_COLLECTION,
                reason: format!(
                    "cache collection must differ from main collection '{}'",
                    self.main_collection
                ),
            });
        }

        for path in [&self.embedder_path, &self.reranker_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Search-time policy derived from this configuration.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            search_results_limit: self.search_results_limit,
            rerank_top_k: self.rerank_top_k,
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::ParseError {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }
}
