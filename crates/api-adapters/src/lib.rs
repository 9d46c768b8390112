//! # api-adapters
//!
//! HTTP surface of Inkwell. With `web-axum` this crate provides the router,
//! the auth middleware and the error-to-JSON mapping; the metrics registry
//! is available regardless of the web framework.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod auth;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod layers;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

pub use metrics::Metrics;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use layers::with_http_layers;
#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::{AppContext, HookVars, Ports};
