use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_embedder_config_default_is_stub() {
        let config = EmbedderConfig::default();
        assert!(config.is_stub());
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(config.max_seq_len, 256);
    }

    #[test]
    fn test_embedder_config_new() {
        let config = EmbedderConfig::new("/models/all-MiniLM-L6-v2");
        assert_eq!(
            config.model_dir,
            Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
        );
        assert!(!config.is_stub());
    }

    #[test]
    fn test_embedder_config_validation_stub() {
        assert!(EmbedderConfig::stub().validate().is_ok());
    }

    #[test]
    fn test_embedder_config_validation_zero_dim() {
        let config = EmbedderConfig::stub().with_embedding_dim(0);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_embedder_config_validation_nonexistent_dir() {
        let config = EmbedderConfig::new("/nonexistent/embedder");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_embedder_config_validation_incomplete_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), "{}").expect("write config");

        let err = EmbedderConfig::new(dir.path()).validate().unwrap_err();
        match err {
            EmbeddingError::ModelNotFound { path } => {
                assert!(path.ends_with("model.safetensors"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_embedding_error_messages_name_the_embedder() {
        let missing = EmbeddingError::ModelNotFound {
            path: std::path::PathBuf::from("/models/minilm"),
        };
        assert_eq!(
            missing.to_string(),
            "sentence embedder model missing at /models/minilm"
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EmbeddingError = io.into();
        assert!(matches!(err, EmbeddingError::ModelLoadFailed { .. }));
        assert!(err.to_string().starts_with("could not load sentence embedder weights"));
    }

    #[test]
    #[serial]
    fn test_embedder_config_from_env() {
        // SAFETY: Test code only, serialized with other env tests.
        unsafe {
            env::set_var(EmbedderConfig::ENV_MODEL_PATH, "  /models/minilm  ");
            env::set_var(EmbedderConfig::ENV_EMBEDDING_DIM, "768");
        }

        let config = EmbedderConfig::from_env();

        // SAFETY: Test code only, serialized with other env tests.
        unsafe {
            env::remove_var(EmbedderConfig::ENV_MODEL_PATH);
            env::remove_var(EmbedderConfig::ENV_EMBEDDING_DIM);
        }

        assert_eq!(config.model_dir, Some(PathBuf::from("/models/minilm")));
        assert_eq!(config.embedding_dim, 768);
    }

    #[test]
    #[serial]
    fn test_embedder_config_from_env_empty() {
        // SAFETY: Test code only, serialized with other env tests.
        unsafe {
            env::remove_var(EmbedderConfig::ENV_MODEL_PATH);
            env::remove_var(EmbedderConfig::ENV_EMBEDDING_DIM);
        }

        let config = EmbedderConfig::from_env();
        assert!(config.is_stub());
        assert_eq!(config.embedding_dim, 384);
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_load_without_model_dir_is_stub() {
        let embedder = SentenceEmbedder::load(EmbedderConfig::stub()).expect("stub loads");
        assert!(embedder.is_stub());
        assert_eq!(embedder.embedding_dim(), 384);
    }

    #[test]
    fn test_stub_embedding_dimension_and_norm() {
        let embedder = SentenceEmbedder::stub();
        let embedding = embedder.embed("death benefit claim").expect("embed");

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding
            .iter()
            .map(|v| v.to_f32() * v.to_f32())
            .sum::<f32>()
            .sqrt();
        assert!((norm - 1.0).abs() < 0.01, "norm was {norm}");
    }

    #[test]
    fn test_stub_is_deterministic() {
        let embedder = SentenceEmbedder::stub();
        let a = embedder.embed("How do I file a death benefit claim?").expect("embed");
        let b = embedder.embed("How do I file a death benefit claim?").expect("embed");
        assert_eq!(a, b);
    }

    #[test]
    fn test_stub_ignores_case_and_punctuation() {
        let embedder = SentenceEmbedder::stub();
        let a = embedder.embed("Death benefit claim").expect("embed");
        let b = embedder.embed("death benefit claim?").expect("embed");
        assert!(squared_l2_distance(&a, &b) < 0.01);
    }

    #[test]
    fn test_stub_shared_words_are_closer() {
        let embedder = SentenceEmbedder::stub();
        let query = embedder.embed("death benefit claim").expect("embed");
        let near = embedder.embed("filing a death benefit claim").expect("embed");
        let far = embedder.embed("premium grace period").expect("embed");

        assert!(squared_l2_distance(&query, &near) < squared_l2_distance(&query, &far));
    }

    #[test]
    fn test_stub_empty_text_is_zero_vector() {
        let embedder = SentenceEmbedder::stub_with_dim(16);
        let embedding = embedder.embed("   ").expect("embed");
        assert_eq!(embedding.len(), 16);
        assert!(embedding.iter().all(|v| v.to_f32() == 0.0));
    }

    #[test]
    fn test_embed_batch_matches_single() {
        let embedder = SentenceEmbedder::stub();
        let batch = embedder
            .embed_batch(&["first page", "second page"])
            .expect("batch");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("first page").expect("embed"));
        assert!(embedder.embed_batch(&[]).expect("empty").is_empty());
    }

    #[test]
    fn test_debug_shows_backend() {
        let debug = format!("{:?}", SentenceEmbedder::stub());
        assert!(debug.contains("Stub"));
        assert!(debug.contains("384"));
    }
}

mod distance_tests {
    use super::*;

    fn v(values: &[f32]) -> Vec<f16> {
        values.iter().map(|&x| f16::from_f32(x)).collect()
    }

    #[test]
    fn test_identical_vectors_are_zero_apart() {
        let a = v(&[0.6, 0.8]);
        assert!(squared_l2_distance(&a, &a) < 1e-3);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let d = squared_l2_distance(&v(&[1.0, 0.0]), &v(&[0.0, 1.0]));
        assert!((d - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_opposite_vectors() {
        let d = squared_l2_distance(&v(&[1.0, 0.0]), &v(&[-1.0, 0.0]));
        assert!((d - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_scale_is_twice_cosine_distance() {
        // cos = 0.9 between these unit vectors.
        let a = v(&[1.0, 0.0]);
        let b = v(&[0.9, 0.435_889_9]);
        let d = squared_l2_distance(&a, &b);
        assert!((d - 0.2).abs() < 2e-3, "got {d}");
        assert!((distance_from_similarity(0.9) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_unnormalised_inputs_are_normalised() {
        let d = squared_l2_distance(&v(&[3.0, 0.0]), &v(&[0.0, 0.5]));
        assert!((d - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_inputs_count_as_orthogonal() {
        assert_eq!(squared_l2_distance(&v(&[0.0, 0.0]), &v(&[1.0, 0.0])), 2.0);
        assert_eq!(squared_l2_distance(&v(&[1.0]), &v(&[1.0, 0.0])), 2.0);
        assert_eq!(squared_l2_distance(&[], &[]), 2.0);
    }

    #[test]
    fn test_similarity_above_one_clamps_to_zero() {
        assert_eq!(distance_from_similarity(1.000_01), 0.0);
    }
}
