use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error body the API answers with: `{message, data: {field: {message}}}`.
/// Inkwell's own handlers use `{error, details}`; both shapes are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostErrorBody {
    #[serde(default, alias = "error")]
    pub message: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("{}", api_message(.status, .body))]
    Api { status: u16, body: HostErrorBody },
}

fn api_message(status: &u16, body: &HostErrorBody) -> String {
    if body.message.is_empty() {
        format!("HTTP {status}")
    } else {
        body.message.clone()
    }
}

/// Flattens an API error into notice lines: the top-level message, then one
/// `<field>: <message>` line per invalid field. Blank messages are skipped.
pub fn alert_messages(body: &HostErrorBody) -> Vec<String> {
    let mut lines = Vec::new();
    if !body.message.is_empty() {
        lines.push(body.message.clone());
    }
    for (field, detail) in &body.data {
        if let Some(message) = detail.get("message").and_then(Value::as_str) {
            if !message.is_empty() {
                lines.push(format!("{field}: {message}"));
            }
        }
    }
    lines
}
