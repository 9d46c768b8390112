//! # Mail clients
//!
//! `LogMailer` writes the message to the log and delivers nothing.
//! `HttpRelayMailer` posts the message as JSON to a relay service that owns
//! actual delivery.

use std::time::Duration;

use async_trait::async_trait;
use domains::{DomainError, MailMessage, Mailer, Result};
use reqwest::Client;

#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let to: Vec<&str> = message.to.iter().map(|a| a.address.as_str()).collect();
        tracing::info!(
            target: "mail",
            from = %message.from.address,
            to = ?to,
            subject = %message.subject,
            "mail not delivered (log transport)"
        );
        Ok(())
    }
}

pub struct HttpRelayMailer {
    http: Client,
    relay_url: url::Url,
}

impl HttpRelayMailer {
    pub fn new(relay_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: crate::http_client(timeout)?,
            relay_url: url::Url::parse(relay_url)?,
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let response = self
            .http
            .post(self.relay_url.clone())
            .json(message)
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("mail relay unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "mail relay rejected message");
            return Err(DomainError::Internal(format!(
                "mail relay answered HTTP {}",
                status.as_u16()
            )));
        }
        tracing::info!(subject = %message.subject, "mail handed to relay");
        Ok(())
    }
}
