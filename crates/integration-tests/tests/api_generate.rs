//! `POST /api/generate` against fake Gemini and image services.

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use integration_tests::{spawn_app, spawn_upstream, AppOptions, TestApp};
use serde_json::{json, Value};

const GENERATED: &str =
    r#"{"title": "Understanding Ownership in Rust", "body": "Every value has a single owner."}"#;

fn gemini_answering(status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/v1beta/models/{model}",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    )
}

fn candidate(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

/// Redirects `/seed/..` to a fixed image, the way the real service does.
fn images_ok() -> Router {
    Router::new()
        .route(
            "/seed/{seed}/{width}/{height}",
            get(|Path((_, width, height)): Path<(String, u32, u32)>| async move {
                Redirect::temporary(&format!("/id/7/{width}/{height}.jpg"))
            }),
        )
        .route(
            "/id/{id}/{width}/{file}",
            get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFF_u8, 0xD8, 0xFF, 0xE0]) }),
        )
}

fn images_failing() -> Router {
    Router::new().route(
        "/seed/{seed}/{width}/{height}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
}

async fn generate(app: &TestApp) -> (u16, Value) {
    app.send(
        app.http
            .post(app.url("/api/generate"))
            .bearer_auth(app.user_token()),
    )
    .await
}

async fn metrics(app: &TestApp) -> String {
    app.http
        .get(app.url("/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn generates_post_with_downloaded_images() {
    let gemini = spawn_upstream(gemini_answering(StatusCode::OK, candidate(GENERATED))).await;
    let images = spawn_upstream(images_ok()).await;
    let app = spawn_app(AppOptions {
        gemini_base_url: gemini,
        images_base_url: images,
        max_images: 3,
        ..AppOptions::default()
    })
    .await;

    for _ in 0..3 {
        let (status, body) = generate(&app).await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["message"], "Post generated successfully");
        assert_eq!(body["record"]["title"], "Understanding Ownership in Rust");
        assert_eq!(body["record"]["body"], "Every value has a single owner.");
        assert_eq!(body["record"]["slug"], "understanding-ownership-in-rust");

        let id = body["record"]["id"].as_str().unwrap();
        assert_eq!(id.len(), 15);
        let image_count = body["record"]["imageCount"].as_u64().unwrap() as usize;
        assert!(image_count <= 3);

        let (status, record) = app
            .send(app.http.get(app.url(&format!("/api/collections/posts/records/{id}"))))
            .await;
        assert_eq!(status, 200);
        assert_eq!(record["user"], "usr000000000001");
        let files = record["files"].as_array().unwrap();
        assert_eq!(files.len(), image_count);
        for name in files {
            let path = app.files.record_dir(id).join(name.as_str().unwrap());
            assert!(path.exists(), "{}", path.display());
        }
    }

    assert!(metrics(&app).await.contains("inkwell_posts_generated_total 3"));
    // Generation writes no audit entries.
    assert!(app.audit_entries().is_empty());
}

#[tokio::test]
async fn failing_image_service_still_saves_the_post_without_files() {
    let gemini = spawn_upstream(gemini_answering(StatusCode::OK, candidate(GENERATED))).await;
    let images = spawn_upstream(images_failing()).await;
    let app = spawn_app(AppOptions {
        gemini_base_url: gemini,
        images_base_url: images,
        max_images: 4,
        ..AppOptions::default()
    })
    .await;

    for _ in 0..3 {
        let (status, body) = generate(&app).await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["record"]["imageCount"], 0);
    }

    let (_, list) = app
        .send(app.http.get(app.url("/api/collections/posts/records")))
        .await;
    assert_eq!(list["totalItems"], 3);
}

#[tokio::test]
async fn plain_text_answer_still_becomes_a_post() {
    let text = "Async Rust is cooperative. Futures do nothing until polled.";
    let gemini = spawn_upstream(gemini_answering(StatusCode::OK, candidate(text))).await;
    let app = spawn_app(AppOptions {
        gemini_base_url: gemini,
        ..AppOptions::default()
    })
    .await;

    let (status, body) = generate(&app).await;
    assert_eq!(status, 200, "{body}");
    assert!(!body["record"]["title"].as_str().unwrap().is_empty());
    assert!(!body["record"]["body"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_status_is_passed_through() {
    let quota = json!({"error": {"code": 429, "message": "Resource has been exhausted"}});
    let gemini = spawn_upstream(gemini_answering(StatusCode::TOO_MANY_REQUESTS, quota.clone())).await;
    let app = spawn_app(AppOptions {
        gemini_base_url: gemini,
        ..AppOptions::default()
    })
    .await;

    let (status, body) = generate(&app).await;
    assert_eq!(status, 429);
    assert_eq!(body["error"], "Failed to generate content with Gemini API");
    let details: Value = serde_json::from_str(body["details"].as_str().unwrap()).unwrap();
    assert_eq!(details, quota);

    assert!(metrics(&app)
        .await
        .contains(r#"inkwell_generation_failures_total{reason="upstream_status"} 1"#));
}

#[tokio::test]
async fn answer_without_candidates_is_a_format_error() {
    let gemini = spawn_upstream(gemini_answering(StatusCode::OK, json!({"promptFeedback": {}}))).await;
    let app = spawn_app(AppOptions {
        gemini_base_url: gemini,
        ..AppOptions::default()
    })
    .await;

    let (status, body) = generate(&app).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Unexpected Gemini API response format");
    assert!(body["details"].as_str().unwrap().contains("promptFeedback"));
}

#[tokio::test]
async fn missing_key_names_the_variable() {
    let app = spawn_app(AppOptions {
        gemini_key: None,
        gemini_key_env: "INKWELL_IT_MISSING_GEMINI_KEY",
        ..AppOptions::default()
    })
    .await;

    let (status, body) = generate(&app).await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({"error": "INKWELL_IT_MISSING_GEMINI_KEY not configured in environment"})
    );
}

#[tokio::test]
async fn unreachable_gemini_is_a_generic_failure() {
    let app = spawn_app(AppOptions::default()).await;

    let (status, body) = generate(&app).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to generate post");
    assert!(body["stack"].is_array());
}

#[tokio::test]
async fn generate_requires_auth() {
    let app = spawn_app(AppOptions::default()).await;
    let (status, body) = app
        .send(app.http.post(app.url("/api/generate")))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "unauthorized");
}
