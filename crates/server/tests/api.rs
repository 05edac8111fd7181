//! Handler tests for the HTTP API
//!
//! These tests drive the full router (CORS and tracing included) with
//! `oneshot`, backed by in-process fakes for the AI services.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

use catalog::{Catalog, CatalogStore, ProductRecord, RawImages, RawPrice};
use enrichment::{DEFAULT_IMAGE_URL, fallback_description};
use ml_client::{ClientError, Embedder, ScoredMatch, TextGenerator, VectorIndex};
use retriever::SemanticRetriever;
use server::api::{self, create_cors_layer};
use server::config::DEFAULT_ALLOWED_ORIGINS;
use server::{AppState, Config, RecommendationOrchestrator, ServiceContext};

// ============================================================================
// Fakes
// ============================================================================

struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> ml_client::Result<Vec<f32>> {
        Ok(vec![0.5; 4])
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> ml_client::Result<Vec<f32>> {
        Err(ClientError::Status {
            service: "embedding service",
            status: 500,
            body: "model crashed".into(),
        })
    }
}

struct RankedIndex(Vec<&'static str>);

#[async_trait]
impl VectorIndex for RankedIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> ml_client::Result<Vec<ScoredMatch>> {
        Ok(self
            .0
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(rank, id)| ScoredMatch::new(*id, 1.0 - rank as f32 / 10.0))
            .collect())
    }
}

struct CopyWriter;

#[async_trait]
impl TextGenerator for CopyWriter {
    async fn generate(&self, _prompt: &str) -> ml_client::Result<String> {
        Ok("Soft, warm and ready for winter.".into())
    }
}

struct QuotaExceeded;

#[async_trait]
impl TextGenerator for QuotaExceeded {
    async fn generate(&self, _prompt: &str) -> ml_client::Result<String> {
        Err(ClientError::Status {
            service: "Gemini",
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        })
    }
}

struct BrokenWriter;

#[async_trait]
impl TextGenerator for BrokenWriter {
    async fn generate(&self, _prompt: &str) -> ml_client::Result<String> {
        panic!("description assembly bug");
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_catalog() -> CatalogStore {
    let catalog = Catalog::from_records(vec![
        ProductRecord::new("p1", "Cozy Winter Blanket")
            .with_price(RawPrice::Text("$24.99".into()))
            .with_images(RawImages::Text(
                "['http://a.com/1.jpg','http://a.com/2.jpg']".into(),
            )),
        ProductRecord::new("p2", "Desk Lamp"),
        ProductRecord::new("p3", "Knitted Throw Pillow")
            .with_price(RawPrice::Number(19.5))
            .with_images(RawImages::Text("[]".into())),
    ])
    .unwrap();
    CatalogStore::ready(catalog)
}

fn build_app(
    catalog: CatalogStore,
    embedder: Arc<dyn Embedder>,
    ranked: Vec<&'static str>,
    generator: Arc<dyn TextGenerator>,
) -> Router {
    let retriever = SemanticRetriever::new(embedder, Arc::new(RankedIndex(ranked)));
    let describer = enrichment::DescriptionGenerator::new(generator);
    let orchestrator = RecommendationOrchestrator::new(catalog, retriever, describer)
        .with_deadline(Duration::from_secs(5));
    let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();

    api::app(AppState::new(orchestrator), create_cors_layer(&origins).unwrap())
}

fn default_app() -> Router {
    build_app(
        test_catalog(),
        Arc::new(FixedEmbedder),
        vec!["p1", "p3"],
        Arc::new(CopyWriter),
    )
}

fn recommend_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// Helper to parse JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_root_returns_welcome_message() {
    let response = default_app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        "Welcome to the Product Recommendation API! (Real Models Loaded)"
    );
}

#[tokio::test]
async fn test_analytics_returns_placeholder() {
    let response = default_app().oneshot(get("/analytics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Analytics data will go here." }));
}

#[tokio::test]
async fn test_recommend_returns_ranked_normalized_products() {
    let response = default_app()
        .oneshot(recommend_request(json!({ "query": "cozy winter blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "products": [
                {
                    "id": "p1",
                    "title": "Cozy Winter Blanket",
                    "image": "http://a.com/1.jpg",
                    "price": 24.99,
                    "description": "Soft, warm and ready for winter."
                },
                {
                    "id": "p3",
                    "title": "Knitted Throw Pillow",
                    "image": DEFAULT_IMAGE_URL,
                    "price": 19.5,
                    "description": "Soft, warm and ready for winter."
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_recommend_degrades_to_empty_when_embedding_fails() {
    let app = build_app(
        test_catalog(),
        Arc::new(FailingEmbedder),
        vec!["p1"],
        Arc::new(CopyWriter),
    );

    let response = app
        .oneshot(recommend_request(json!({ "query": "blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await, json!({ "products": [] }));
}

#[tokio::test]
async fn test_recommend_uses_fallback_description_when_generation_fails() {
    let app = build_app(
        test_catalog(),
        Arc::new(FixedEmbedder),
        vec!["p2"],
        Arc::new(QuotaExceeded),
    );

    let response = app
        .oneshot(recommend_request(json!({ "query": "lamp" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["products"][0]["description"], fallback_description("Desk Lamp"));
    assert_eq!(body["products"][0]["price"], 0.0);
}

#[tokio::test]
async fn test_recommend_with_unavailable_catalog_is_500() {
    let app = build_app(
        CatalogStore::unavailable("snapshot missing"),
        Arc::new(FixedEmbedder),
        vec!["p1"],
        Arc::new(CopyWriter),
    );

    let response = app
        .oneshot(recommend_request(json!({ "query": "blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response.into_body()).await,
        json!({ "detail": "Server error: Product data not loaded." })
    );
}

#[tokio::test]
async fn test_recommend_with_unknown_ranked_id_is_500() {
    let app = build_app(
        test_catalog(),
        Arc::new(FixedEmbedder),
        vec!["p1", "missing"],
        Arc::new(CopyWriter),
    );

    let response = app
        .oneshot(recommend_request(json!({ "query": "blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response.into_body()).await,
        json!({ "detail": "Internal server error" })
    );
}

#[tokio::test]
async fn test_recommend_panic_becomes_internal_error() {
    let app = build_app(
        test_catalog(),
        Arc::new(FixedEmbedder),
        vec!["p1"],
        Arc::new(BrokenWriter),
    );
    let request = Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::from(json!({ "query": "blanket" }).to_string()))
        .unwrap();

    // spawned so a panic escaping the router would surface as a JoinError
    let response = tokio::spawn(app.oneshot(request))
        .await
        .expect("panic is handled inside the router")
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        json_body(response.into_body()).await,
        json!({ "detail": "Internal server error" })
    );
}

#[tokio::test]
async fn test_recommend_without_query_is_422() {
    let response = default_app()
        .oneshot(recommend_request(json!({ "text": "blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_and_ready() {
    let response = default_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "recs-server");

    let response = default_app().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await["status"], "ready");
}

#[tokio::test]
async fn test_ready_is_503_without_catalog() {
    let app = build_app(
        CatalogStore::unavailable("snapshot missing"),
        Arc::new(FixedEmbedder),
        vec![],
        Arc::new(CopyWriter),
    );

    let response = app.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response.into_body()).await["status"], "unavailable");
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/recommend")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = default_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();

    let response = default_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_service_context_without_catalog_fails_fast() {
    let config = Config::from_lookup(|key| match key {
        "PINECONE_API_KEY" => Some("pc-test".into()),
        "GOOGLE_API_KEY" => Some("g-test".into()),
        // never contacted: the request fails before retrieval
        "EMBEDDING_BASE_URL" => Some("http://127.0.0.1:9/v1".into()),
        "PINECONE_INDEX_HOST" => Some("http://127.0.0.1:9".into()),
        _ => None,
    })
    .unwrap();
    let context =
        ServiceContext::with_catalog(config, CatalogStore::unavailable("no file")).unwrap();
    assert!(!context.orchestrator().is_ready());

    let response = context
        .router()
        .unwrap()
        .oneshot(recommend_request(json!({ "query": "blanket" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response.into_body()).await["detail"],
        "Server error: Product data not loaded."
    );
}
