use dashmap::DashMap;
use domains::{DomainError, Identity, IdentityResolver, Result};

use crate::bearer_token;

/// Fixed token table. Unknown tokens are rejected.
#[derive(Debug, Default)]
pub struct StaticTokenResolver {
    tokens: DashMap<String, Identity>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

impl IdentityResolver for StaticTokenResolver {
    fn resolve(&self, token: &str) -> Result<Identity> {
        let token = bearer_token(token).ok_or_else(|| DomainError::Unauthorized("missing token".into()))?;
        self.tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::Unauthorized("unknown token".into()))
    }
}
