use super::*;
use serial_test::serial;
use std::path::PathBuf;

#[test]
fn test_config_defaults() {
    let config = CrossEncoderConfig::default();
    assert!(config.model_dir.is_none());
    assert_eq!(config.max_seq_len, 512);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_empty_model_dir() {
    let config = CrossEncoderConfig::new("");
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_tiny_max_seq_len() {
    let config = CrossEncoderConfig::stub().with_max_seq_len(1);
    assert!(config.validate().unwrap_err().contains("max_seq_len"));
}

#[test]
#[serial]
fn test_config_from_env() {
    // SAFETY: Test code only, serialized with other env tests.
    unsafe { std::env::set_var(CrossEncoderConfig::ENV_MODEL_PATH, "/models/ms-marco") };
    let config = CrossEncoderConfig::from_env();
    // SAFETY: Test code only, serialized with other env tests.
    unsafe { std::env::remove_var(CrossEncoderConfig::ENV_MODEL_PATH) };

    assert_eq!(config.model_dir, Some(PathBuf::from("/models/ms-marco")));
}

#[test]
fn test_load_without_model_dir_is_stub() {
    let encoder = CrossEncoder::load(CrossEncoderConfig::stub()).expect("stub loads");
    assert!(!encoder.is_model_loaded());
}

#[test]
fn test_load_missing_dir_fails() {
    let err = CrossEncoder::load(CrossEncoderConfig::new("/nonexistent/ms-marco")).unwrap_err();
    assert!(matches!(err, RerankerError::ModelNotFound { .. }));
}

#[test]
fn test_load_incomplete_dir_names_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = CrossEncoder::load(CrossEncoderConfig::new(dir.path())).unwrap_err();
    assert!(err.to_string().contains("config.json"));
}

#[test]
fn test_stub_score_prefers_overlapping_passage() {
    let encoder = CrossEncoder::stub();
    let query = "How do I file a death benefit claim?";

    let relevant = encoder
        .score(
            query,
            "To file a death benefit claim, the beneficiary submits a claim form.",
        )
        .expect("score");
    let unrelated = encoder
        .score(query, "Premiums are due on the first day of each month.")
        .expect("score");

    assert!(relevant > unrelated);
}

#[test]
fn test_stub_score_bounds_and_determinism() {
    let encoder = CrossEncoder::stub();
    let a = encoder.score("grace period", "The grace period is 31 days.").expect("score");
    let b = encoder.score("grace period", "The grace period is 31 days.").expect("score");

    assert_eq!(a, b);
    assert!(a.is_finite());
    assert!((0.0..=1.0).contains(&a));
}

#[test]
fn test_stub_score_stop_word_query_is_zero() {
    let encoder = CrossEncoder::stub();
    assert_eq!(encoder.score("what is the", "anything at all").expect("score"), 0.0);
}

#[test]
fn test_debug_output() {
    let debug = format!("{:?}", CrossEncoder::stub());
    assert!(debug.contains("CrossEncoder"));
    assert!(debug.contains("model_loaded: false"));
}

#[test]
fn test_embedding_error_conversion() {
    let err: RerankerError = crate::embedding::EmbeddingError::TokenizationFailed {
        reason: "bad vocab".to_string(),
    }
    .into();
    assert!(matches!(err, RerankerError::TokenizationFailed { .. }));
}
