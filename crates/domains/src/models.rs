//! # Domain Models
//!
//! These structs represent the records and payloads Inkwell moves around.
//! Field names serialize the way the site client expects them
//! (`collectionId`, `collectionName`, ...).

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Identity;

/// Name of the only collection this site manages.
pub const POSTS_COLLECTION: &str = "posts";

/// Stable id of the posts collection.
pub const POSTS_COLLECTION_ID: &str = "pbc_posts000001";

/// A blog post as stored by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// 15 character lowercase alphanumeric record id
    pub id: String,
    pub collection_id: String,
    pub collection_name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub title: String,
    /// Markdown source
    pub body: String,
    /// URL-safe, at most [`Post::MAX_SLUG_LEN`] characters. Not unique.
    pub slug: String,
    /// Id of the authenticated user that created the post, if any
    pub user: Option<String>,
    /// Stored attachment names, in upload order
    pub files: Vec<String>,
}

impl Post {
    pub const MAX_FILES: usize = 4;
    pub const MAX_SLUG_LEN: usize = 60;
}

/// Fields a client supplies when creating a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(skip)]
    pub user: Option<String>,
}

/// Partial update of a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub slug: Option<String>,
}

/// The normalized projection returned after generating a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub body: String,
    pub slug: String,
    pub image_count: usize,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
            slug: post.slug.clone(),
            image_count: post.files.len(),
        }
    }
}

/// A file waiting to be attached to a record.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Original file name, e.g. `photo.jpg`
    pub name: String,
    pub content_type: mime::Mime,
    pub bytes: Bytes,
}

/// Live application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub meta: SettingsMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsMeta {
    pub app_name: String,
    pub app_url: String,
    pub sender_name: String,
    pub sender_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: MailAddress,
    pub to: Vec<MailAddress>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// What the audit writer knows about the request that triggered an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub identity: Identity,
}

/// One create/update/delete event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: AuditAction,
    pub collection: String,
    pub record_id: String,
    /// Snapshot of the record after the event (before it, for deletes)
    pub record: serde_json::Value,
    pub request: RequestContext,
    pub created: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        collection: &str,
        record_id: &str,
        record: serde_json::Value,
        request: RequestContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            collection: collection.to_string(),
            record_id: record_id.to_string(),
            record,
            request,
            created: Utc::now(),
        }
    }
}
