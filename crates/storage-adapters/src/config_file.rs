use std::path::PathBuf;

use async_trait::async_trait;
use domains::{ConfigSource, DomainError, Result};

/// Reads the public config document from a JSON file on every call.
pub struct JsonFileConfigSource {
    path: PathBuf,
}

impl JsonFileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigSource for JsonFileConfigSource {
    async fn load(&self) -> Result<serde_json::Value> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Configuration(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::Configuration(format!("cannot parse {}: {e}", self.path.display()))
        })
    }
}
