//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use domains::{ContentGenerator, DomainError, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiOptions {
    /// Name of the environment variable read on every request.
    pub api_key_env: String,
    /// Fallback key when the variable is unset or empty.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: Value,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key_env: String,
    api_key: Option<SecretString>,
}

impl GeminiClient {
    pub fn new(options: GeminiOptions) -> anyhow::Result<Self> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            options.base_url.trim_end_matches('/'),
            options.model
        );
        // Fail at startup on a malformed base URL.
        url::Url::parse(&endpoint)?;

        Ok(Self {
            http: crate::http_client(options.timeout)?,
            endpoint,
            api_key_env: options.api_key_env,
            api_key: options.api_key,
        })
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.api_key
                    .as_ref()
                    .map(|key| key.expose_secret().to_string())
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

/// Asks for a JSON object with required `title` and `body` strings.
fn generation_config() -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "body": { "type": "STRING" }
            },
            "required": ["title", "body"]
        }
    })
}

/// `candidates[0].content.parts[0].text`, if present.
fn first_candidate_text(response: &Value) -> Option<&str> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self.api_key().ok_or_else(|| {
            error!(env = %self.api_key_env, "gemini api key missing");
            DomainError::Configuration(format!("{} not configured in environment", self.api_key_env))
        })?;

        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: generation_config(),
        };

        debug!(endpoint = %self.endpoint, "sending request to gemini");
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("gemini request failed: {}", e.without_url())))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| DomainError::Internal(format!("gemini response unreadable: {}", e.without_url())))?;
        debug!(status = status.as_u16(), "gemini responded");

        if status != reqwest::StatusCode::OK {
            error!(status = status.as_u16(), body = %raw, "gemini api error response");
            return Err(DomainError::Upstream {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: Value = serde_json::from_str(&raw)
            .map_err(|_| DomainError::UpstreamFormat(raw.clone()))?;
        match first_candidate_text(&parsed) {
            Some(text) => Ok(text.to_string()),
            None => {
                error!(body = %parsed, "unexpected gemini response format");
                Err(DomainError::UpstreamFormat(parsed.to_string()))
            }
        }
    }
}
