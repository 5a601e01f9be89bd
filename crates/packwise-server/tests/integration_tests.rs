//! Integration tests for the packing-list HTTP surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use packwise_answer::{AnswerClient, MockAnswerEngine};
use packwise_domain::KnowledgeKey;
use packwise_ingest::{IngestConfig, Ingestor, StaticFetcher, StaticSearch};
use packwise_llm::MockProvider;
use packwise_pipeline::Pipeline;
use packwise_server::handlers::{
    create_router, AppState, ErrorResponse, HealthCheckResponse, PackingListResponse,
};
use packwise_store::{CacheProbe, MemoryStore, ObjectStore};
use packwise_synthesizer::{Synthesizer, SynthesizerConfig};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const MODEL_OUTPUT: &str = r#"{"packing_list":[
    {"item":"下着","quantity":3},
    {"item":"Tシャツ","quantity":3},
    {"item":"ズボン","quantity":2},
    {"item":"靴下","quantity":3},
    {"item":"パスポート","quantity":1}
]}"#;

/// Helper to create an app over in-memory fakes
async fn create_test_app(search: StaticSearch, model_output: &str) -> Router {
    let store = MemoryStore::new();
    let cached = KnowledgeKey::new("Hawaii").source_object("html", 0);
    store
        .put(&cached, "<html>cached</html>".into(), "text/html; charset=utf-8")
        .await
        .unwrap();
    let store: Arc<dyn ObjectStore> = Arc::new(store);

    let pipeline = Pipeline::new(
        CacheProbe::new(store.clone(), "html"),
        Ingestor::new(
            Arc::new(search),
            Arc::new(StaticFetcher::new()),
            store,
            IngestConfig::default(),
        ),
        AnswerClient::new(Arc::new(MockAnswerEngine::answering(
            "ハワイは一年中暖かく、日差しが強いです。",
        ))),
        Synthesizer::new(
            Arc::new(MockProvider::new(model_output)),
            SynthesizerConfig::default(),
        ),
    );

    create_router(AppState {
        pipeline: Arc::new(pipeline),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_generate_packing_list_warm_cache() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (status, body) = get(app, "/generate-packing-list?destination=Hawaii&num_day=3").await;

    assert_eq!(status, StatusCode::OK);
    let list: PackingListResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.destination, "Hawaii");
    assert_eq!(list.number_of_people, 3);
    assert_eq!(list.summary, "ハワイは一年中暖かく、日差しが強いです。");
    assert_eq!(list.packing_list.len(), 5);
    assert!(list.packing_list.iter().all(|i| i.quantity >= 1));
}

#[tokio::test]
async fn test_response_field_names() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (_, body) = get(app, "/generate-packing-list?destination=Hawaii&num_day=3").await;

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    for key in ["destination", "number_of_people", "summary", "packing_list"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["packing_list"][4]["item"], "パスポート");
    assert_eq!(json["packing_list"][4]["quantity"], 1);
}

#[tokio::test]
async fn test_short_destination_is_unprocessable() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (status, body) = get(app, "/generate-packing-list?destination=A&num_day=3").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("2-50"));
}

#[tokio::test]
async fn test_zero_days_is_unprocessable() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (status, _) = get(app, "/generate-packing-list?destination=Hawaii&num_day=0").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_num_day_is_bad_request() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    let (status, _) = get(app, "/generate-packing-list?destination=Hawaii").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uncached_destination_without_results_is_not_found() {
    let app = create_test_app(StaticSearch::empty(), MODEL_OUTPUT).await;

    // ハワイ is cached under a different key than Hawaii
    let (status, body) = get(
        app,
        "/generate-packing-list?destination=%E3%83%8F%E3%83%AF%E3%82%A4&num_day=2",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("No search results"));
}

#[tokio::test]
async fn test_malformed_model_output_is_server_error() {
    let app = create_test_app(StaticSearch::empty(), "no list today").await;

    let (status, body) = get(app, "/generate-packing-list?destination=Hawaii&num_day=3").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("Malformed model output"));
}
