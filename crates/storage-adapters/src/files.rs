//! # Local file store
//!
//! Filesystem implementation of `FileStore`.
//! Attachments live under `<root>/<record_id>/`; each stored name carries a
//! short content hash so two uploads with the same name never collide.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{Attachment, DomainError, FileStore, Result};
use sha2::{Digest, Sha256};
use tokio::fs;

pub struct LocalFileStore {
    /// Root directory for all attachments (e.g., "./data/storage")
    root_path: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root.into(),
        }
    }

    pub fn record_dir(&self, record_id: &str) -> PathBuf {
        self.root_path.join(record_id)
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    /// Writes the bytes as `<stem>_<hash10>.<ext>` and returns that name.
    async fn save(&self, record_id: &str, attachment: Attachment) -> Result<String> {
        if !is_safe_segment(record_id) {
            return Err(DomainError::Validation(format!("invalid record id {record_id:?}")));
        }

        let mut hasher = Sha256::new();
        hasher.update(&attachment.bytes);
        let hash = hex::encode(hasher.finalize());

        let name = stored_name(&attachment.name, &attachment.content_type, &hash[..10]);
        let dir = self.record_dir(record_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Internal(format!("create {}: {e}", dir.display())))?;

        let target = dir.join(&name);
        fs::write(&target, &attachment.bytes)
            .await
            .map_err(|e| DomainError::Internal(format!("write {}: {e}", target.display())))?;

        tracing::debug!(record_id, file = %name, bytes = attachment.bytes.len(), "stored attachment");
        Ok(name)
    }

    async fn remove_all(&self, record_id: &str) -> Result<()> {
        if !is_safe_segment(record_id) {
            return Err(DomainError::Validation(format!("invalid record id {record_id:?}")));
        }
        match fs::remove_dir_all(self.record_dir(record_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(format!("remove files of {record_id}: {e}"))),
        }
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Sanitized stem plus hash, keeping or guessing the extension.
fn stored_name(original: &str, content_type: &mime::Mime, hash: &str) -> String {
    let path = Path::new(original);
    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .take(40)
        .collect();
    let stem = if stem.trim_matches('_').is_empty() { "file".to_string() } else { stem };

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .or_else(|| {
            mime_guess::get_mime_extensions(content_type)
                .and_then(|exts| exts.first())
                .map(|e| e.to_string())
        });

    match ext {
        Some(ext) => format!("{stem}_{hash}.{ext}"),
        None => format!("{stem}_{hash}"),
    }
}
