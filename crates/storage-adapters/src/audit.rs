//! # Audit log writers
//!
//! Three `AuditLog` implementations:
//! - `TracingAuditLog` emits each entry as a structured event on the `audit` target
//! - `JsonlAuditLog` appends one JSON document per line to a file
//! - `MemoryAuditLog` keeps entries in process, for tests and local tooling

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use domains::{AuditEntry, AuditLog, DomainError, Result};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Default)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        tracing::info!(
            target: "audit",
            audit_id = %entry.id,
            action = entry.action.as_str(),
            collection = %entry.collection,
            record_id = %entry.record_id,
            method = %entry.request.method,
            path = %entry.request.path,
            actor = entry.request.identity.display_name().unwrap_or("anonymous"),
            "record changed"
        );
        Ok(())
    }
}

pub struct JsonlAuditLog {
    path: PathBuf,
    // Serializes appends so lines never interleave.
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        let mut line = serde_json::to_vec(&entry).map_err(|e| DomainError::Internal(e.to_string()))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DomainError::Internal(format!("open {}: {e}", self.path.display())))?;
        file.write_all(&line)
            .await
            .map_err(|e| DomainError::Internal(format!("append {}: {e}", self.path.display())))?;
        file.flush()
            .await
            .map_err(|e| DomainError::Internal(format!("flush {}: {e}", self.path.display())))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| DomainError::Internal("audit log lock poisoned".into()))?
            .push(entry);
        Ok(())
    }
}
