//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use api_adapters::{router, AppContext, HookVars, Ports};
use auth_adapters::StaticTokenResolver;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domains::{
    AuditAction, DomainError, Identity, MockContentGenerator, MockFileFetcher, MockMailer,
    Settings, SettingsMeta,
};
use serde_json::{json, Value};
use services::ImageOptions;
use storage_adapters::{
    InMemoryPostRepository, InMemorySettings, JsonFileConfigSource, LocalFileStore, MemoryAuditLog,
};
use tower::ServiceExt;

const USER_TOKEN: &str = "user-token";
const ADMIN_TOKEN: &str = "admin-token";

struct Harness {
    app: Router,
    audit: Arc<MemoryAuditLog>,
    config_path: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

fn harness(generator: MockContentGenerator, mailer: MockMailer) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"site": {"name": "placeholder"}, "signupAllowed": true}"#).unwrap();

    let audit = Arc::new(MemoryAuditLog::new());
    let identity = StaticTokenResolver::new()
        .with_token(
            USER_TOKEN,
            Identity::RecordUser {
                id: "user00000000001".into(),
                collection: "users".into(),
                name: "Ann".into(),
                email: "ann@example.com".into(),
            },
        )
        .with_token(
            ADMIN_TOKEN,
            Identity::Admin {
                id: "admin0000000001".into(),
                email: "root@example.com".into(),
            },
        );

    let ports = Ports {
        settings: Arc::new(InMemorySettings::new(Settings {
            meta: SettingsMeta {
                app_name: "Inkwell".into(),
                app_url: "http://localhost:8090".into(),
                sender_name: "Inkwell".into(),
                sender_address: "noreply@example.com".into(),
            },
        })),
        posts: Arc::new(InMemoryPostRepository::new()),
        files: Arc::new(LocalFileStore::new(dir.path().join("storage"))),
        generator: Arc::new(generator),
        fetcher: Arc::new(MockFileFetcher::new()),
        mailer: Arc::new(mailer),
        audit: audit.clone(),
        config_source: Arc::new(JsonFileConfigSource::new(&config_path)),
        identity: Arc::new(identity),
    };
    let images = ImageOptions {
        max_count: 0,
        ..ImageOptions::default()
    };
    let ctx = AppContext::new(ports, images, HookVars::default());

    Harness {
        app: router(ctx),
        audit,
        config_path,
        _dir: dir,
    }
}

fn default_harness() -> Harness {
    harness(MockContentGenerator::new(), MockMailer::new())
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let h = default_harness();
    let (status, body) = send(&h.app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn hello_requires_auth() {
    let h = default_harness();
    let (status, body) = send(&h.app, request("GET", "/api/hello", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&h.app, request("GET", "/api/hello", Some("bogus"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn hello_greets_user_by_name_and_admin_by_email() {
    let h = default_harness();
    let (status, body) = send(&h.app, request("GET", "/api/hello", Some(USER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Hello Ann", "foo": "bar"}));

    let (_, body) = send(&h.app, request("GET", "/api/hello", Some(ADMIN_TOKEN), None)).await;
    assert_eq!(body["message"], "Hello root@example.com");
}

#[tokio::test]
async fn generate_returns_summary_and_counts_it() {
    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_| Ok(r#"{"title": "Runes in Svelte 5", "body": "Body text"}"#.to_string()));
    let h = harness(generator, MockMailer::new());

    let (status, body) = send(&h.app, request("POST", "/api/generate", Some(USER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Post generated successfully");
    assert_eq!(body["record"]["title"], "Runes in Svelte 5");
    assert_eq!(body["record"]["body"], "Body text");
    assert_eq!(body["record"]["slug"], "runes-in-svelte-5");
    assert_eq!(body["record"]["imageCount"], 0);
    assert_eq!(body["record"]["id"].as_str().map(str::len), Some(15));

    // Generation is not a records API request, so nothing is audited.
    assert!(h.audit.entries().is_empty());

    let response = h
        .app
        .clone()
        .oneshot(request("GET", "/api/metrics", None, None))
        .await
        .unwrap();
    let text = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("inkwell_posts_generated_total 1"), "{text}");
}

#[tokio::test]
async fn generate_without_key_is_a_500_with_exact_message() {
    let mut generator = MockContentGenerator::new();
    generator.expect_generate().returning(|_| {
        Err(DomainError::Configuration(
            "GEMINI_API_KEY not configured in environment".into(),
        ))
    });
    let h = harness(generator, MockMailer::new());

    let (status, body) = send(&h.app, request("POST", "/api/generate", Some(ADMIN_TOKEN), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "GEMINI_API_KEY not configured in environment"}));
}

#[tokio::test]
async fn generate_passes_upstream_status_through() {
    let mut generator = MockContentGenerator::new();
    generator.expect_generate().returning(|_| {
        Err(DomainError::Upstream {
            status: 429,
            body: r#"{"error":{"code":429}}"#.into(),
        })
    });
    let h = harness(generator, MockMailer::new());

    let (status, body) = send(&h.app, request("POST", "/api/generate", Some(USER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Failed to generate content with Gemini API");
    assert_eq!(body["details"], r#"{"error":{"code":429}}"#);

    let (_, list) = send(&h.app, request("GET", "/api/collections/posts/records", None, None)).await;
    assert_eq!(list["totalItems"], 0);
}

#[tokio::test]
async fn sendmail_echoes_the_message() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|m| m.to.len() == 1 && m.to[0].address == "ann@example.com")
        .times(1)
        .returning(|_| Ok(()));
    let h = harness(MockContentGenerator::new(), mailer);

    let (status, body) = send(&h.app, request("POST", "/api/sendmail", Some(USER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["subject"], "test email from Inkwell");
    assert_eq!(body["message"]["from"]["address"], "noreply@example.com");
}

#[tokio::test]
async fn sendmail_failure_is_500() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .returning(|_| Err(DomainError::Internal("smtp down".into())));
    let h = harness(MockContentGenerator::new(), mailer);

    let (status, _) = send(&h.app, request("POST", "/api/sendmail", Some(ADMIN_TOKEN), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn config_is_merged_and_reread_every_time() {
    let h = default_harness();
    let (status, body) = send(&h.app, request("GET", "/api/config", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site"]["name"], "Inkwell");
    assert_eq!(body["site"]["copyright"], "Inkwell");
    assert_eq!(body["signupAllowed"], true);

    std::fs::write(&h.config_path, r#"{"signupAllowed": false}"#).unwrap();
    let (_, body) = send(&h.app, request("GET", "/api/config", None, None)).await;
    assert_eq!(body["signupAllowed"], false);
    assert_eq!(body["site"]["name"], "Inkwell");

    std::fs::write(&h.config_path, "{broken").unwrap();
    let (status, _) = send(&h.app, request("GET", "/api/config", None, None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn records_crud_runs_hooks() {
    let h = default_harness();

    let (status, created) = send(
        &h.app,
        request(
            "POST",
            "/api/collections/posts/records",
            Some(USER_TOKEN),
            Some(json!({"title": "Hello World!", "body": "first"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["slug"], "hello-world");
    assert_eq!(created["user"], "user00000000001");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &h.app,
        request(
            "PATCH",
            &format!("/api/collections/posts/records/{id}"),
            Some(ADMIN_TOKEN),
            Some(json!({"title": "Renamed", "slug": ""})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "renamed");

    let (status, _) = send(
        &h.app,
        request("DELETE", &format!("/api/collections/posts/records/{id}"), Some(USER_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &h.app,
        request("GET", &format!("/api/collections/posts/records/{id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entries = h.audit.entries();
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Insert, AuditAction::Update, AuditAction::Delete]
    );
    assert_eq!(entries[0].request.method, "POST");
    assert_eq!(entries[2].request.path, format!("/api/collections/posts/records/{id}"));
    assert_eq!(entries[1].record["title"], "Renamed");
}

#[tokio::test]
async fn record_writes_need_auth_and_valid_input() {
    let h = default_harness();
    let (status, _) = send(
        &h.app,
        request("POST", "/api/collections/posts/records", None, Some(json!({"title": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/api/collections/posts/records",
            Some(USER_TOKEN),
            Some(json!({"title": "   "})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = send(
        &h.app,
        request(
            "POST",
            "/api/collections/posts/records",
            Some(USER_TOKEN),
            Some(json!({"title": "ok", "slug": "Not Valid"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        request("POST", "/api/collections/posts/records", Some(USER_TOKEN), Some(json!({"body": "no title"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.audit.entries().is_empty());
}

#[tokio::test]
async fn responses_carry_a_request_id_when_layered() {
    let h = default_harness();
    let app = api_adapters::with_http_layers(h.app.clone());
    let response = app
        .oneshot(request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
