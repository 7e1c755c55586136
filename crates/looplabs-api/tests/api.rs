//! Router tests with an offline text service and a fake renderer.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use looplabs_ai::OfflineGenerator;
use looplabs_api::{create_router, ApiConfig, AppState};
use looplabs_engine::{EngineConfig, Pipeline};
use looplabs_media::{MediaError, MediaResult, Renderer};
use looplabs_models::caption::{FALLBACK_CAPTION, FALLBACK_HASHTAGS};
use looplabs_models::SessionMetadata;

struct FakeRenderer {
    fail: bool,
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, _metadata: &SessionMetadata, dest: &Path) -> MediaResult<()> {
        if self.fail {
            return Err(MediaError::ffmpeg_failed("encoder exploded", None, Some(1)));
        }
        tokio::fs::write(dest, b"fake mp4").await?;
        Ok(())
    }

    async fn thumbnail(&self, _video: &Path, dest: &Path, at: f64) -> MediaResult<f64> {
        tokio::fs::write(dest, b"fake png").await?;
        Ok(at)
    }
}

fn app(root: &Path, fail_render: bool, max_sessions: usize) -> Router {
    let engine = Arc::new(
        EngineConfig::default()
            .with_output_root(root.join("output"))
            .with_style_dir(root.join("styles")),
    );
    let pipeline = Pipeline::new(
        engine,
        Arc::new(OfflineGenerator),
        Arc::new(FakeRenderer { fail: fail_render }),
    );
    let config = ApiConfig {
        max_concurrent_sessions: max_sessions,
        ..Default::default()
    };
    create_router(AppState::new(config, pipeline), None)
}

fn post_generate(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_generate_writes_pack() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(post_generate(r#"{"prompt": "golden sunrise", "style": "luxury"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["caption"], FALLBACK_CAPTION);
    assert_eq!(body["hashtags"].as_array().unwrap().len(), FALLBACK_HASHTAGS.len());
    assert_eq!(body["manifest"]["prompt"], "golden sunrise");
    assert_eq!(body["manifest"]["style"], "luxury");
    assert_eq!(body["thumbnail_created"], true);

    let output_dir = Path::new(body["output_dir"].as_str().unwrap());
    assert!(output_dir.join("package_manifest.json").exists());
    assert!(output_dir.join("caption.txt").exists());
    assert!(output_dir.join("hashtags.txt").exists());
}

#[tokio::test]
async fn test_generate_defaults_style() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(post_generate(r#"{"prompt": "neon rain"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["manifest"]["style"], "minimalist");
}

#[tokio::test]
async fn test_generate_rejects_empty_prompt() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(post_generate(r#"{"prompt": "", "style": "luxury"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].is_string());
    assert!(!root.path().join("output").exists());
}

#[tokio::test]
async fn test_generate_rejects_blank_prompt() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(post_generate(r#"{"prompt": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_rejects_malformed_json() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(post_generate(r#"{"style": "luxury""#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_render_failure_is_500() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), true, 1)
        .oneshot(post_generate(r#"{"prompt": "golden sunrise"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], "render");
    assert!(body["detail"].as_str().unwrap().contains("encoder exploded"));
}

#[tokio::test]
async fn test_production_hides_render_details() {
    let root = tempfile::tempdir().unwrap();
    let engine = Arc::new(EngineConfig::default().with_output_root(root.path().join("output")));
    let pipeline = Pipeline::new(
        engine,
        Arc::new(OfflineGenerator),
        Arc::new(FakeRenderer { fail: true }),
    );
    let config = ApiConfig {
        environment: "production".to_string(),
        ..Default::default()
    };

    let response = create_router(AppState::new(config, pipeline), None)
        .oneshot(post_generate(r#"{"prompt": "golden sunrise"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "An internal error occurred");
    assert_eq!(body["code"], "render");
    assert!(!body.to_string().contains("encoder exploded"));
}

#[tokio::test]
async fn test_busy_when_no_session_slots() {
    let root = tempfile::tempdir().unwrap();
    let engine = Arc::new(EngineConfig::default().with_output_root(root.path().join("output")));
    let pipeline = Pipeline::new(
        engine,
        Arc::new(OfflineGenerator),
        Arc::new(FakeRenderer { fail: false }),
    );
    let state = AppState::new(
        ApiConfig {
            max_concurrent_sessions: 1,
            ..Default::default()
        },
        pipeline,
    );
    let _held = state.try_claim_session().unwrap();

    let response = create_router(state, None)
        .oneshot(post_generate(r#"{"prompt": "golden sunrise"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let root = tempfile::tempdir().unwrap();
    let response = app(root.path(), false, 1)
        .oneshot(
            Request::get("/health")
                .header("X-Request-ID", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["X-Request-ID"], "abc-123");
}
