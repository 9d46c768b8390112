//! The test email sent to the signed-in account.

use std::sync::Arc;

use domains::{DomainError, Identity, MailAddress, MailMessage, Mailer, Result, SettingsProvider};

#[derive(Clone)]
pub struct MailService {
    settings: Arc<dyn SettingsProvider>,
    mailer: Arc<dyn Mailer>,
}

impl MailService {
    pub fn new(settings: Arc<dyn SettingsProvider>, mailer: Arc<dyn Mailer>) -> Self {
        Self { settings, mailer }
    }

    /// Sends the fixed test message to the identity's address and returns it.
    pub async fn send_test_mail(&self, identity: &Identity) -> Result<MailMessage> {
        let to = identity
            .email()
            .ok_or_else(|| DomainError::Validation("the account has no email address".into()))?;
        let message = test_message(&self.settings.settings().meta, to);
        self.mailer.send(&message).await?;
        tracing::info!(to = %to, subject = %message.subject, "test email sent");
        Ok(message)
    }
}

fn test_message(meta: &domains::SettingsMeta, to: &str) -> MailMessage {
    MailMessage {
        from: MailAddress {
            address: meta.sender_address.clone(),
            name: meta.sender_name.clone(),
        },
        to: vec![MailAddress {
            address: to.to_string(),
            name: String::new(),
        }],
        subject: format!("test email from {}", meta.sender_name),
        text: "Test email".to_string(),
        html: "<strong>Test</strong> <em>email</em>".to_string(),
    }
}
