//! # DomainError
//!
//! Centralized error handling for Inkwell.
//! Adapters wrap their failures into these variants at the port boundary so
//! the HTTP layer can map them to status codes without knowing the adapter.

use thiserror::Error;

/// The primary error type for all port and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g., a post record)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., slug too long, too many files)
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A required setting is absent (e.g., the Gemini API key)
    #[error("{0}")]
    Configuration(String),

    /// An upstream HTTP service answered with a non-success status.
    /// The raw body is kept verbatim for passthrough.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// An upstream HTTP service answered 200 with a body of the wrong shape
    #[error("unexpected upstream response: {0}")]
    UpstreamFormat(String),

    /// The record store rejected a read or write
    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),

    /// Infrastructure failure (e.g., network down, disk full)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(kind.to_string(), id.to_string())
    }

    /// Wraps any adapter error as a persistence failure.
    pub fn persistence(err: impl Into<anyhow::Error>) -> Self {
        Self::Persistence(err.into())
    }

    /// Renders the error and every source beneath it, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut chain = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        chain
    }
}

/// A specialized Result type for Inkwell domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
