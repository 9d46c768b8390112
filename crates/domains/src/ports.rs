//! # Ports
//!
//! Every collaborator a handler talks to sits behind one of these traits.
//! Adapter crates implement them; the binary wires concrete adapters into
//! the application context.

use async_trait::async_trait;

use crate::errors::Result;
use crate::identity::Identity;
use crate::models::{Attachment, AuditEntry, MailMessage, Post, Settings};

/// Data persistence contract for post records.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post>;
    async fn update(&self, post: Post) -> Result<Post>;
    /// Removes the record and returns it, or `None` when it did not exist.
    async fn delete(&self, id: &str) -> Result<Option<Post>>;
    async fn get(&self, id: &str) -> Result<Option<Post>>;
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>>;
}

/// Storage for record attachments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Saves the attachment under the record and returns the stored file name.
    async fn save(&self, record_id: &str, attachment: Attachment) -> Result<String>;
    /// Drops every file stored for the record.
    async fn remove_all(&self, record_id: &str) -> Result<()>;
}

/// Read access to live application settings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> Settings;
}

/// Source of the static public configuration document.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Reads the document. Called on every request; implementations must not cache.
    async fn load(&self) -> Result<serde_json::Value>;
}

/// A generative text API.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Sends one prompt and returns the inner text of the first candidate.
    ///
    /// Errors:
    /// - `Configuration` when no API key is available
    /// - `Upstream` for any non-200 answer, carrying the raw body
    /// - `UpstreamFormat` when the answer lacks a first candidate's content
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Downloads remote files so they can be attached to records.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Attachment>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Writer for create/update/delete audit entries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<()>;
}

/// Turns a bearer token into an identity.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Identity>;
}
