use std::time::Duration;

use async_trait::async_trait;
use domains::{Attachment, DomainError, FileFetcher, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Downloads a URL into an [`Attachment`]. Redirects are followed.
pub struct HttpFileFetcher {
    http: Client,
}

impl HttpFileFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: crate::http_client(timeout)?,
        })
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, url: &str) -> Result<Attachment> {
        let parsed = url::Url::parse(url)
            .map_err(|e| DomainError::Validation(format!("invalid file url {url:?}: {e}")))?;

        let response = self
            .http
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // The final URL after redirects names the file better than the request URL.
        let final_url = response.url().clone();
        let header_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<mime::Mime>().ok());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::Internal(format!("read {url}: {e}")))?;

        let name = file_name(&final_url)
            .or_else(|| file_name(&parsed))
            .unwrap_or_else(|| "file".to_string());
        let content_type = header_type
            .unwrap_or_else(|| mime_guess::from_path(&name).first_or_octet_stream());

        tracing::debug!(url, name = %name, content_type = %content_type, bytes = bytes.len(), "fetched remote file");
        Ok(Attachment {
            name,
            content_type,
            bytes,
        })
    }
}

/// Last non-empty path segment.
fn file_name(url: &url::Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
