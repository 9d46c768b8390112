//! # configs
//!
//! Layered configuration for the Inkwell server.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/<INKWELL_ENV>.toml` (optional)
//! 4. `INKWELL__SECTION__KEY` environment variables
//!
//! The binaries load `.env` into the process environment before calling
//! [`AppConfig::from_dir`].

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "INKWELL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Seed values for the live application settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub app_name: String,
    pub app_url: String,
    pub sender_name: String,
    pub sender_address: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            app_name: "Inkwell".to_string(),
            app_url: "http://127.0.0.1:8090".to_string(),
            sender_name: "Support".to_string(),
            sender_address: "support@example.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Static JSON document served by `GET /api/config`
    pub config_path: PathBuf,
    /// Host-injected variable echoed by `GET /api/hello`
    pub foo: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("hooks/config.json"),
            foo: "bar".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<SecretString>,
    pub files_dir: PathBuf,
    /// JSON-lines audit file; audit entries go to the log when unset
    pub audit_log_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            files_dir: PathBuf::from("data/storage"),
            audit_log_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<SecretString>,
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 14 * 24 * 3600,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Used only when the `api_key_env` variable is unset at request time
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub base_url: String,
    pub max_count: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://picsum.photos".to_string(),
            max_count: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    Log,
    Http,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub relay_url: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::Log,
            relay_url: None,
        }
    }
}

impl AppConfig {
    /// Loads `<dir>/default.toml` and `<dir>/<profile>.toml`, optionally
    /// overlaid with `INKWELL__*` environment variables.
    pub fn from_dir(dir: &Path, profile: &str, with_env: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::from(dir.join("default.toml")).required(false))
            .add_source(File::from(dir.join(format!("{profile}.toml"))).required(false));
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_none() {
            return Err(ConfigError::Invalid("auth.jwt_secret is required".into()));
        }
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none() {
            return Err(ConfigError::Invalid(
                "storage.database_url is required for the postgres backend".into(),
            ));
        }
        if self.mail.transport == MailTransport::Http && self.mail.relay_url.is_none() {
            return Err(ConfigError::Invalid(
                "mail.relay_url is required for the http transport".into(),
            ));
        }
        if self.images.max_count > 4 {
            return Err(ConfigError::Invalid(
                "images.max_count cannot exceed 4 attachments per post".into(),
            ));
        }
        Ok(())
    }
}
