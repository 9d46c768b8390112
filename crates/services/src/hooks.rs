//! Record lifecycle callbacks.
//!
//! `before_save` runs on every create and update of a post, whatever path
//! triggered it. `RecordHooks::after_request` runs only after a records API
//! request succeeded and feeds the audit log.

use std::sync::Arc;

use domains::{AuditAction, AuditEntry, AuditLog, Post, RequestContext, Result};

use crate::slug::slugify;

/// Assigns a slug derived from the title when none was given.
pub fn before_save(post: &mut Post) {
    if post.slug.trim().is_empty() {
        post.slug = slugify(&post.title);
    }
}

#[derive(Clone)]
pub struct RecordHooks {
    audit: Arc<dyn AuditLog>,
}

impl RecordHooks {
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit }
    }

    /// Writes the audit entry for a finished create/update/delete request.
    /// A failing writer fails the request; the write is not undone.
    pub async fn after_request(
        &self,
        action: AuditAction,
        post: &Post,
        request: &RequestContext,
    ) -> Result<()> {
        let snapshot = serde_json::to_value(post)
            .map_err(|e| domains::DomainError::Internal(e.to_string()))?;
        let entry = AuditEntry::new(
            action,
            &post.collection_name,
            &post.id,
            snapshot,
            request.clone(),
        );
        tracing::debug!(
            action = action.as_str(),
            record_id = %post.id,
            "writing audit entry"
        );
        self.audit.record(entry).await
    }
}
