//! # remote-adapters
//!
//! Ports backed by outbound HTTP: the Gemini content generator, the remote
//! file fetcher and the mail clients.

pub mod fetcher;
pub mod gemini;
pub mod mail;

pub use fetcher::HttpFileFetcher;
pub use gemini::{GeminiClient, GeminiOptions};
pub use mail::{HttpRelayMailer, LogMailer};

use std::time::Duration;

/// Shared outbound client settings.
pub(crate) fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("inkwell/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;

    /// Serves the router on an ephemeral local port and returns its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}
