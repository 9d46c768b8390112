use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::{ClientError, HostErrorBody};

/// HTTP access to the Inkwell API from the site front end.
#[derive(Debug, Clone)]
pub struct SiteClient {
    http: Client,
    base_url: Url,
}

impl SiteClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("inkwell-site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Requests the admin UI and reports whether the server redirected it,
    /// which happens while installation is unfinished.
    pub async fn admin_redirected(&self) -> Result<bool, ClientError> {
        let requested = self.url("_/")?;
        let response = self.http.get(requested.clone()).send().await?;
        Ok(response.url() != &requested)
    }

    /// `GET /api/config`.
    pub async fn fetch_config(&self) -> Result<Value, ClientError> {
        self.get_json("api/config").await
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let response = self.http.get(self.url(path)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<HostErrorBody>().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
