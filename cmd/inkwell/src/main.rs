//! # Inkwell Binary
//!
//! The entry point that assembles the application based on configuration
//! and compile-time features.

#[cfg(not(feature = "web-axum"))]
compile_error!("the inkwell binary needs the `web-axum` feature");

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use api_adapters::{router, with_http_layers, AppContext, HookVars, Ports};
use clap::Parser;
use configs::{AppConfig, LogFormat, MailTransport, StorageBackend};
use domains::{AuditLog, IdentityResolver, Mailer, PostRepository, Settings, SettingsMeta};
use remote_adapters::{GeminiClient, GeminiOptions, HttpFileFetcher, HttpRelayMailer, LogMailer};
use secrecy::{ExposeSecret, SecretString};
use services::ImageOptions;
use storage_adapters::{
    InMemoryPostRepository, InMemorySettings, JsonFileConfigSource, JsonlAuditLog, LocalFileStore,
    TracingAuditLog,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Inkwell content site backend.
#[derive(Parser, Debug)]
#[command(name = "inkwell")]
#[command(about = "Content site backend with AI post generation", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: PathBuf,

    /// Directory holding default.toml and <profile>.toml.
    #[arg(long, env = "INKWELL_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Configuration profile.
    #[arg(long, env = "INKWELL_ENV", default_value = "development")]
    profile: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dotenv.exists() {
        dotenvy::from_path(&args.dotenv)
            .with_context(|| format!("loading {}", args.dotenv.display()))?;
    }

    let config = AppConfig::from_dir(&args.config_dir, &args.profile, true)?;
    init_tracing(&config);
    tracing::info!(profile = %args.profile, "configuration loaded");

    let ctx = build_context(&config).await?;
    let app = with_http_layers(router(ctx));

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "inkwell listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("inkwell stopped");
    Ok(())
}

/// `RUST_LOG` wins over `log.level`.
fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_context(config: &AppConfig) -> anyhow::Result<AppContext> {
    // 1. Settings
    let settings = Arc::new(InMemorySettings::new(Settings {
        meta: SettingsMeta {
            app_name: config.site.app_name.clone(),
            app_url: config.site.app_url.clone(),
            sender_name: config.site.sender_name.clone(),
            sender_address: config.site.sender_address.clone(),
        },
    }));

    // 2. Post repository
    let posts: Arc<dyn PostRepository> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory post repository; posts are lost on restart");
            Arc::new(InMemoryPostRepository::new())
        }
        StorageBackend::Postgres => postgres_repository(config).await?,
    };

    // 3. Attachments, audit and the public config file
    let files = Arc::new(LocalFileStore::new(&config.storage.files_dir));
    let audit: Arc<dyn AuditLog> = match &config.storage.audit_log_path {
        Some(path) => Arc::new(JsonlAuditLog::new(path)),
        None => Arc::new(TracingAuditLog),
    };
    let config_source = Arc::new(JsonFileConfigSource::new(&config.hooks.config_path));

    // 4. Outbound HTTP
    let generator = Arc::new(GeminiClient::new(GeminiOptions {
        api_key_env: config.gemini.api_key_env.clone(),
        api_key: config
            .gemini
            .api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_string())),
        model: config.gemini.model.clone(),
        base_url: config.gemini.base_url.clone(),
        timeout: Duration::from_secs(config.gemini.timeout_secs),
    })?);
    let fetcher = Arc::new(HttpFileFetcher::new(FETCH_TIMEOUT)?);
    let mailer: Arc<dyn Mailer> = match config.mail.transport {
        MailTransport::Log => Arc::new(LogMailer),
        MailTransport::Http => {
            let relay_url = config
                .mail
                .relay_url
                .as_deref()
                .context("mail.relay_url is required for the http transport")?;
            Arc::new(HttpRelayMailer::new(relay_url, FETCH_TIMEOUT)?)
        }
    };

    // 5. Identity
    let identity = identity_resolver(config)?;

    let ports = Ports {
        settings,
        posts,
        files,
        generator,
        fetcher,
        mailer,
        audit,
        config_source,
        identity,
    };
    let images = ImageOptions {
        base_url: config.images.base_url.clone(),
        max_count: config.images.max_count,
        ..ImageOptions::default()
    };
    let vars = HookVars {
        foo: config.hooks.foo.clone(),
    };
    Ok(AppContext::new(ports, images, vars))
}

#[cfg(feature = "db-postgres")]
async fn postgres_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
    let url = config
        .storage
        .database_url
        .as_ref()
        .context("storage.database_url is required for the postgres backend")?;
    let repo = storage_adapters::PgPostRepository::connect(url.expose_secret()).await?;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "db-postgres"))]
async fn postgres_repository(_config: &AppConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
    anyhow::bail!("storage.backend = \"postgres\" needs a build with the `db-postgres` feature")
}

#[cfg(feature = "auth-jwt")]
fn identity_resolver(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityResolver>> {
    let secret = config
        .auth
        .jwt_secret
        .as_ref()
        .context("auth.jwt_secret is required")?;
    Ok(Arc::new(auth_adapters::JwtIdentityResolver::new(
        secret,
        config.auth.token_ttl_secs,
    )))
}

#[cfg(not(feature = "auth-jwt"))]
fn identity_resolver(_config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityResolver>> {
    tracing::warn!("built without `auth-jwt`; every protected route will answer 401");
    Ok(Arc::new(auth_adapters::StaticTokenResolver::new()))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
