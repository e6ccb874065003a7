use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, ScoredPoint, Value};

use super::mock::MockVectorIndex;
use super::model::{PAYLOAD_DOC_ID, PAYLOAD_TEXT};
use super::*;

const TEST_COLLECTION: &str = "test_collection";

fn page(id: &str, text: &str, label: &str) -> IndexRecord {
    IndexRecord::new(id, text)
        .with_metadata("policy_name", "Sample-Policy")
        .with_metadata("page_label", label)
}

#[tokio::test]
async fn test_mock_add_and_count() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    assert_eq!(index.count().await.unwrap(), 0);

    index
        .add(vec![
            page("0", "death benefit claim procedure", "1"),
            page("1", "premium payment schedule", "2"),
        ])
        .await
        .expect("add");

    assert_eq!(index.count().await.unwrap(), 2);
    assert_eq!(index.name(), TEST_COLLECTION);
}

#[tokio::test]
async fn test_mock_add_same_id_replaces() {
    let index = MockVectorIndex::new(TEST_COLLECTION);

    index.add(vec![page("0", "first version", "1")]).await.unwrap();
    index.add(vec![page("1", "other page", "2")]).await.unwrap();
    index.add(vec![page("0", "second version", "1")]).await.unwrap();

    let records = index.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "0");
    assert_eq!(records[0].text, "second version");
}

#[tokio::test]
async fn test_mock_query_orders_by_distance() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index
        .add(vec![
            page("0", "premium payment schedule", "1"),
            page("1", "death benefit claim procedure", "2"),
            page("2", "death benefit", "3"),
        ])
        .await
        .unwrap();

    let hits = index.query("death benefit claim procedure", 3).await.unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].id, "1");
    assert!(hits[0].distance < 1e-3);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(
        hits[0].metadata.get("page_label"),
        Some(&MetadataValue::from("2"))
    );
}

#[tokio::test]
async fn test_mock_query_respects_k_and_empty_index() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    assert!(index.query("anything", 5).await.unwrap().is_empty());

    index
        .add((0..5).map(|i| page(&i.to_string(), "same text", "1")).collect())
        .await
        .unwrap();

    let hits = index.query("same text", 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "0");
    assert_eq!(hits[1].id, "1");
}

#[tokio::test]
async fn test_mock_fixed_distance() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index.add(vec![page("0", "text", "1")]).await.unwrap();

    index.set_fixed_distance(Some(0.2));
    let hits = index.query("unrelated words", 1).await.unwrap();
    assert_eq!(hits[0].distance, 0.2);

    index.set_fixed_distance(None);
    let hits = index.query("text", 1).await.unwrap();
    assert!(hits[0].distance < 1e-3);
}

#[tokio::test]
async fn test_mock_failure_injection() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index.set_failing(true);

    assert!(matches!(
        index.query("q", 1).await,
        Err(VectorDbError::SearchFailed { .. })
    ));
    assert!(matches!(
        index.add(vec![page("0", "t", "1")]).await,
        Err(VectorDbError::UpsertFailed { .. })
    ));
    assert!(matches!(
        index.count().await,
        Err(VectorDbError::CountFailed { .. })
    ));
    assert_eq!(index.query_calls(), 1);
    assert_eq!(index.add_calls(), 1);
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_mock_write_failure_leaves_reads_working() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index.add(vec![page("0", "death benefit", "1")]).await.unwrap();
    index.set_failing_writes(true);

    assert!(matches!(
        index.add(vec![page("1", "grace period", "2")]).await,
        Err(VectorDbError::UpsertFailed { .. })
    ));
    assert_eq!(index.query("death benefit", 1).await.unwrap().len(), 1);
    assert_eq!(index.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_arc_index_shares_state() {
    let index = std::sync::Arc::new(MockVectorIndex::new(TEST_COLLECTION));
    let shared = index.clone();

    shared.add(vec![page("0", "t", "1")]).await.unwrap();
    assert_eq!(VectorIndex::count(&index).await.unwrap(), 1);
    assert_eq!(VectorIndex::name(&index), TEST_COLLECTION);
}

#[test]
fn test_record_payload_contains_id_text_and_metadata() {
    let payload = page("7", "page seven", "8").to_payload();

    assert_eq!(payload.len(), 4);
    assert_eq!(
        payload.get(PAYLOAD_DOC_ID).and_then(|v| v.as_str()).map(String::as_str),
        Some("7")
    );
    assert_eq!(
        payload.get(PAYLOAD_TEXT).and_then(|v| v.as_str()).map(String::as_str),
        Some("page seven")
    );
    assert_eq!(
        payload.get("page_label").and_then(|v| v.as_str()).map(String::as_str),
        Some("8")
    );
}

fn scored_point(payload: HashMap<String, Value>, score: f32) -> ScoredPoint {
    ScoredPoint {
        id: Some(PointId::from(42u64)),
        payload,
        score,
        ..Default::default()
    }
}

#[test]
fn test_hit_from_scored_point() {
    let mut payload = page("3", "page three", "4").to_payload();
    payload.insert("ids0".to_string(), "9".into());
    payload.insert("distances0".to_string(), 0.25f64.into());

    let hit = IndexHit::from_scored_point(scored_point(payload, 0.75)).expect("hit");

    // 2 * (1 - 0.75)

    assert_eq!(hit.id, "3");
    assert_eq!(hit.text, "page three");
    assert!((hit.distance - 0.5).abs() < 1e-6);
    assert_eq!(hit.metadata.get("ids0"), Some(&MetadataValue::from("9")));
    assert_eq!(
        hit.metadata.get("distances0").and_then(MetadataValue::as_f64),
        Some(0.25)
    );
    assert!(!hit.metadata.contains_key(PAYLOAD_DOC_ID));
    assert!(!hit.metadata.contains_key(PAYLOAD_TEXT));
}

#[test]
fn test_hit_without_doc_id_is_malformed() {
    let mut payload = HashMap::new();
    payload.insert(PAYLOAD_TEXT.to_string(), Value::from("orphan"));

    let err = IndexHit::from_scored_point(scored_point(payload, 0.9)).unwrap_err();

    match err {
        VectorDbError::MalformedPoint {
            point_id,
            distance,
            field,
        } => {
            assert_eq!(point_id, "42");
            assert!((distance - 0.2).abs() < 1e-6);
            assert_eq!(field, PAYLOAD_DOC_ID);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_hit_with_non_string_doc_id_is_malformed() {
    let mut payload = HashMap::new();
    payload.insert(PAYLOAD_DOC_ID.to_string(), Value::from(7i64));

    assert!(matches!(
        IndexHit::from_scored_point(scored_point(payload, 0.5)),
        Err(VectorDbError::MalformedPoint { .. })
    ));
}

#[test]
fn test_perfect_score_is_zero_distance() {
    let payload = page("1", "t", "2").to_payload();
    let hit = IndexHit::from_scored_point(scored_point(payload, 1.0)).unwrap();
    assert_eq!(hit.distance, 0.0);
}

#[tokio::test]
async fn test_mock_malformed_hits() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index.set_malformed_hits(true);
    assert!(index.query("q", 1).await.unwrap().is_empty());

    index.add(vec![page("0", "some page", "1")]).await.unwrap();
    match index.query("some page", 1).await {
        Err(VectorDbError::MalformedPoint { point_id, field, .. }) => {
            assert_eq!(point_id, "0");
            assert_eq!(field, PAYLOAD_DOC_ID);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    index.set_malformed_hits(false);
    assert_eq!(index.query("some page", 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mock_distances_use_squared_l2_scale() {
    let index = MockVectorIndex::new(TEST_COLLECTION);
    index
        .add(vec![page("0", "death benefit claim form", "1")])
        .await
        .unwrap();

    let hits = index
        .query("death benefit claim form deadline", 1)
        .await
        .unwrap();

    // Four of five words shared: cos = 4 / (2 * sqrt(5)) ≈ 0.894.
    assert!((hits[0].distance - 0.2111).abs() < 2e-3, "got {}", hits[0].distance);
}

#[test]
fn test_metadata_value_views() {
    assert_eq!(MetadataValue::from("0.125").as_f64(), Some(0.125));
    assert_eq!(MetadataValue::from(3i64).as_f64(), Some(3.0));
    assert_eq!(MetadataValue::from("abc").as_f64(), None);
    assert_eq!(MetadataValue::from(true).as_f64(), None);
    assert_eq!(MetadataValue::from("x").as_str(), Some("x"));
    assert_eq!(MetadataValue::from(1.5f64).as_str(), None);
    assert_eq!(MetadataValue::from(12i64).to_string(), "12");
}

#[test]
fn test_metadata_value_serde_untagged() {
    let json = r#"{"a": "text", "b": 3, "c": 0.5, "d": false}"#;
    let metadata: Metadata = serde_json::from_str(json).expect("parse");

    assert_eq!(metadata["a"], MetadataValue::Str("text".to_string()));
    assert_eq!(metadata["b"], MetadataValue::Int(3));
    assert_eq!(metadata["c"], MetadataValue::Float(0.5));
    assert_eq!(metadata["d"], MetadataValue::Bool(false));
}

#[test]
fn test_write_consistency_maps_to_wait_flag() {
    assert!(bool::from(WriteConsistency::Strong));
    assert!(!bool::from(WriteConsistency::Eventual));
}
