//! Post writes: validation, attachment storage and persistence.
//!
//! This is the upsert form of the site. Every create and update passes the
//! `before_save` hook, then validation, then the repository.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Attachment, DomainError, FileStore, Post, PostDraft, PostPatch, PostRepository, Result,
    POSTS_COLLECTION, POSTS_COLLECTION_ID,
};

use crate::hooks::before_save;
use crate::plan::new_record_id;
use crate::slug::is_valid_slug;

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    files: Arc<dyn FileStore>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, files: Arc<dyn FileStore>) -> Self {
        Self { repo, files }
    }

    /// Validates and writes a new post together with its attachments.
    pub async fn create(&self, draft: PostDraft, attachments: Vec<Attachment>) -> Result<Post> {
        if attachments.len() > Post::MAX_FILES {
            return Err(DomainError::Validation(format!(
                "files: at most {} files are allowed",
                Post::MAX_FILES
            )));
        }

        let now = Utc::now();
        let mut post = Post {
            id: new_record_id(&mut rand::thread_rng()),
            collection_id: POSTS_COLLECTION_ID.to_string(),
            collection_name: POSTS_COLLECTION.to_string(),
            created: now,
            updated: now,
            title: draft.title,
            body: draft.body,
            slug: draft.slug.unwrap_or_default(),
            user: draft.user,
            files: Vec::with_capacity(attachments.len()),
        };
        before_save(&mut post);
        validate(&post)?;

        for attachment in attachments {
            let stored = self.files.save(&post.id, attachment).await?;
            post.files.push(stored);
        }

        match self.repo.create(post.clone()).await {
            Ok(saved) => Ok(saved),
            Err(err) => {
                if !post.files.is_empty() {
                    if let Err(cleanup) = self.files.remove_all(&post.id).await {
                        tracing::warn!(record_id = %post.id, error = %cleanup, "failed to drop orphaned files");
                    }
                }
                Err(err)
            }
        }
    }

    pub async fn update(&self, id: &str, patch: PostPatch) -> Result<Post> {
        let mut post = self.get(id).await?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(body) = patch.body {
            post.body = body;
        }
        if let Some(slug) = patch.slug {
            post.slug = slug;
        }
        post.updated = Utc::now();
        before_save(&mut post);
        validate(&post)?;
        self.repo.update(post).await
    }

    /// Removes the post and its files, returning the removed record.
    pub async fn delete(&self, id: &str) -> Result<Post> {
        let post = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        if !post.files.is_empty() {
            if let Err(cleanup) = self.files.remove_all(&post.id).await {
                tracing::warn!(record_id = %post.id, error = %cleanup, "failed to remove files of deleted post");
            }
        }
        Ok(post)
    }

    pub async fn get(&self, id: &str) -> Result<Post> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        self.repo.list().await
    }
}

fn validate(post: &Post) -> Result<()> {
    if post.title.trim().is_empty() {
        return Err(DomainError::Validation("title: cannot be blank".into()));
    }
    if !is_valid_slug(&post.slug) {
        return Err(DomainError::Validation(format!(
            "slug: must be at most {} characters of a-z, 0-9 and -",
            Post::MAX_SLUG_LEN
        )));
    }
    if post.files.len() > Post::MAX_FILES {
        return Err(DomainError::Validation(format!(
            "files: at most {} files are allowed",
            Post::MAX_FILES
        )));
    }
    Ok(())
}
