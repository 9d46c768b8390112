//! Shared harness for the end-to-end tests.
//!
//! [`spawn_app`] serves the real router on an ephemeral port, wired to real
//! adapters: JWT identities, a local file store and a JSONL audit log in a
//! temp dir, and a Gemini client pointed at whatever upstream the test
//! starts with [`spawn_upstream`].

#![cfg(feature = "web-axum")]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use api_adapters::{router, with_http_layers, AppContext, HookVars, Ports};
use auth_adapters::JwtIdentityResolver;
use axum::Router;
use domains::{AuditEntry, Identity, Mailer, Settings, SettingsMeta};
use remote_adapters::{GeminiClient, GeminiOptions, HttpFileFetcher, LogMailer};
use secrecy::SecretString;
use serde_json::Value;
use services::ImageOptions;
use storage_adapters::{
    InMemoryPostRepository, InMemorySettings, JsonFileConfigSource, JsonlAuditLog, LocalFileStore,
};
use tempfile::TempDir;

pub const JWT_SECRET: &str = "integration-test-secret-integration-test-secret";
pub const GEMINI_MODEL: &str = "gemini-test";

/// Serves the router on 127.0.0.1:0 and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

pub struct AppOptions {
    /// Base URL of the fake Gemini API. Defaults to a closed port.
    pub gemini_base_url: String,
    /// Gemini key from configuration; the env var named by
    /// `gemini_key_env` is never set by these tests.
    pub gemini_key: Option<&'static str>,
    pub gemini_key_env: &'static str,
    /// Base URL of the fake image service.
    pub images_base_url: String,
    pub max_images: usize,
    pub mailer: Arc<dyn Mailer>,
    /// Written to the hooks config file before the server starts.
    pub site_config: Value,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            gemini_key: Some("test-key"),
            gemini_key_env: "INKWELL_IT_UNSET_GEMINI_KEY",
            images_base_url: "http://127.0.0.1:9".to_string(),
            max_images: 0,
            mailer: Arc::new(LogMailer),
            site_config: serde_json::json!({
                "site": {"name": "", "copyright": "", "year": 2025},
                "signupAllowed": true
            }),
        }
    }
}

pub struct TestApp {
    pub base_url: String,
    pub http: reqwest::Client,
    pub files: LocalFileStore,
    pub audit_path: PathBuf,
    pub config_path: PathBuf,
    tokens: Arc<JwtIdentityResolver>,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, identity: &Identity) -> String {
        self.tokens.issue(identity).expect("issue token")
    }

    pub fn user_token(&self) -> String {
        self.token_for(&user())
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&admin())
    }

    /// Every audit line written so far, oldest first.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        match std::fs::read_to_string(&self.audit_path) {
            Ok(text) => text
                .lines()
                .map(|line| serde_json::from_str(line).expect("audit line is an entry"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Sends the request and returns the status with the decoded JSON body
    /// (`Null` for an empty body).
    pub async fn send(&self, request: reqwest::RequestBuilder) -> (u16, Value) {
        let response = request.send().await.expect("request reaches the app");
        let status = response.status().as_u16();
        let bytes = response.bytes().await.expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }
}

pub fn user() -> Identity {
    Identity::RecordUser {
        id: "usr000000000001".into(),
        collection: "users".into(),
        name: "Ann".into(),
        email: "ann@example.com".into(),
    }
}

pub fn admin() -> Identity {
    Identity::Admin {
        id: "adm000000000001".into(),
        email: "root@example.com".into(),
    }
}

pub async fn spawn_app(options: AppOptions) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("hooks").join("config.json");
    std::fs::create_dir_all(dir.path().join("hooks")).expect("hooks dir");
    std::fs::write(&config_path, options.site_config.to_string()).expect("write config");
    let audit_path = dir.path().join("audit.jsonl");
    let files_root = dir.path().join("storage");

    let tokens = Arc::new(JwtIdentityResolver::new(
        &SecretString::from(String::from(JWT_SECRET)),
        3600,
    ));

    let generator = GeminiClient::new(GeminiOptions {
        api_key_env: options.gemini_key_env.to_string(),
        api_key: options.gemini_key.map(|key| SecretString::from(key.to_string())),
        model: GEMINI_MODEL.to_string(),
        base_url: options.gemini_base_url,
        timeout: Duration::from_secs(5),
    })
    .expect("gemini client");

    let ports = Ports {
        settings: Arc::new(InMemorySettings::new(Settings {
            meta: SettingsMeta {
                app_name: "Inkwell".into(),
                app_url: "http://127.0.0.1:8090".into(),
                sender_name: "Support".into(),
                sender_address: "support@example.com".into(),
            },
        })),
        posts: Arc::new(InMemoryPostRepository::new()),
        files: Arc::new(LocalFileStore::new(&files_root)),
        generator: Arc::new(generator),
        fetcher: Arc::new(HttpFileFetcher::new(Duration::from_secs(5)).expect("fetcher")),
        mailer: options.mailer,
        audit: Arc::new(JsonlAuditLog::new(&audit_path)),
        config_source: Arc::new(JsonFileConfigSource::new(&config_path)),
        identity: tokens.clone(),
    };
    let images = ImageOptions {
        base_url: options.images_base_url,
        max_count: options.max_images,
        ..ImageOptions::default()
    };
    let ctx = AppContext::new(ports, images, HookVars::default());
    let base_url = spawn_upstream(with_http_layers(router(ctx))).await;

    TestApp {
        base_url,
        http: reqwest::Client::new(),
        files: LocalFileStore::new(files_root),
        audit_path,
        config_path,
        tokens,
        _dir: dir,
    }
}
