//! The public configuration document served to the site client.

use std::sync::Arc;

use domains::{ConfigSource, DomainError, Result, SettingsProvider};
use serde_json::{Map, Value};

#[derive(Clone)]
pub struct SiteConfigService {
    source: Arc<dyn ConfigSource>,
    settings: Arc<dyn SettingsProvider>,
}

impl SiteConfigService {
    pub fn new(source: Arc<dyn ConfigSource>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self { source, settings }
    }

    /// Reads the static document and overlays the live site name.
    /// Nothing is cached: every call reads the source and the settings again.
    pub async fn load(&self) -> Result<Value> {
        let mut config = self.source.load().await?;
        let app_name = self.settings.settings().meta.app_name;

        let root = config
            .as_object_mut()
            .ok_or_else(|| DomainError::Configuration("config document must be a JSON object".into()))?;
        let site = root
            .entry("site")
            .or_insert_with(|| Value::Object(Map::new()));
        if !site.is_object() {
            *site = Value::Object(Map::new());
        }
        if let Some(site) = site.as_object_mut() {
            site.insert("name".into(), Value::String(app_name.clone()));
            site.insert("copyright".into(), Value::String(app_name));
        }
        Ok(config)
    }
}
