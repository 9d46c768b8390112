//! # auth-adapters
//!
//! `IdentityResolver` implementations. Both take the bearer token with or
//! without its `Bearer ` prefix.
//!
//! - `StaticTokenResolver` maps fixed tokens to identities (local tooling, tests)
//! - `JwtIdentityResolver` verifies HS256 tokens (feature `auth-jwt`)

pub mod static_tokens;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use static_tokens::StaticTokenResolver;

#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtIdentityResolver, TokenError, TokenKind};

/// Strips an optional, case-insensitive `Bearer ` prefix from an
/// `Authorization` header value. Blank values give `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let trimmed = header.trim();
    let token = match trimmed.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
        _ if trimmed.eq_ignore_ascii_case("bearer") => "",
        _ => trimmed,
    };
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
