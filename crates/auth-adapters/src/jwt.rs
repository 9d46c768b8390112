//! # JWT identity resolver
//!
//! HS256 tokens whose claims name the account kind. Admin tokens carry an
//! id and email; user tokens additionally carry a display name and the auth
//! collection they belong to.

use chrono::Utc;
use domains::{DomainError, Identity, IdentityResolver, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bearer_token;

const DEFAULT_USER_COLLECTION: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn into_identity(self) -> Identity {
        match self.kind {
            TokenKind::Admin => Identity::Admin {
                id: self.sub,
                email: self.email,
            },
            TokenKind::User => Identity::RecordUser {
                id: self.sub,
                collection: self
                    .collection
                    .unwrap_or_else(|| DEFAULT_USER_COLLECTION.to_string()),
                name: self.name,
                email: self.email,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("anonymous identities cannot be issued a token")]
    Anonymous,
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

pub struct JwtIdentityResolver {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtIdentityResolver {
    pub fn new(secret: &SecretString, ttl_secs: u64) -> Self {
        let raw = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(raw),
            decoding: DecodingKey::from_secret(raw),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX / 2),
        }
    }

    /// Signs a token for the identity, valid for the configured TTL.
    pub fn issue(&self, identity: &Identity) -> std::result::Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = match identity {
            Identity::Admin { id, email } => Claims {
                sub: id.clone(),
                kind: TokenKind::Admin,
                email: email.clone(),
                name: String::new(),
                collection: None,
                iat: now,
                exp: now.saturating_add(self.ttl_secs),
            },
            Identity::RecordUser {
                id,
                collection,
                name,
                email,
            } => Claims {
                sub: id.clone(),
                kind: TokenKind::User,
                email: email.clone(),
                name: name.clone(),
                collection: Some(collection.clone()),
                iat: now,
                exp: now.saturating_add(self.ttl_secs),
            },
            Identity::Anonymous => return Err(TokenError::Anonymous),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, token: &str) -> Result<Identity> {
        let token = bearer_token(token).ok_or_else(|| DomainError::Unauthorized("missing token".into()))?;
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            DomainError::Unauthorized(format!("invalid token: {err}"))
        })?;
        Ok(data.claims.into_identity())
    }
}
