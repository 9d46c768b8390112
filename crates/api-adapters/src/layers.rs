//! Cross-cutting HTTP layers: request ids, tracing spans and CORS.

use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps the router so every request gets an `x-request-id` (kept when the
/// client sent one), a span carrying that id, and permissive CORS.
pub fn with_http_layers(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
