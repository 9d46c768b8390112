//! # In-memory post repository
//!
//! Process-local `PostRepository` backed by a `DashMap`. Used for local
//! development and tests; contents vanish on restart.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{DomainError, Post, PostRepository, Result};

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: DashMap<String, Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post> {
        use dashmap::mapref::entry::Entry;
        match self.posts.entry(post.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::persistence(anyhow::anyhow!(
                "post {} already exists",
                post.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(post.clone());
                Ok(post)
            }
        }
    }

    async fn update(&self, post: Post) -> Result<Post> {
        match self.posts.get_mut(&post.id) {
            Some(mut existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(DomainError::not_found("post", &post.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.remove(id).map(|(_, post)| post))
    }

    async fn get(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get(id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|entry| entry.value().clone()).collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
        Ok(posts)
    }
}
