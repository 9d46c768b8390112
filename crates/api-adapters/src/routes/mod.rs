//! API route definitions.

pub mod config;
pub mod generate;
pub mod hello;
pub mod mail;
pub mod records;
pub mod system;

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::auth::{load_identity, require_admin_or_record_auth};
use crate::state::AppContext;

pub const RECORDS_PATH: &str = "/api/collections/posts/records";
pub const RECORD_PATH: &str = "/api/collections/posts/records/{id}";

/// Build the complete API router.
///
/// # Route Structure
///
/// ## Public (no auth)
/// - `GET /api/health`
/// - `GET /api/metrics` - OpenMetrics text
/// - `GET /api/config` - public config merged with live settings
/// - `GET /api/collections/posts/records` - newest first
/// - `GET /api/collections/posts/records/{id}`
///
/// ## Admin or record auth
/// - `GET /api/hello`
/// - `POST /api/sendmail`
/// - `POST /api/generate`
/// - `POST /api/collections/posts/records`
/// - `PATCH /api/collections/posts/records/{id}`
/// - `DELETE /api/collections/posts/records/{id}`
pub fn router(ctx: AppContext) -> Router {
    let public = Router::new()
        .route("/api/health", get(system::health))
        .route("/api/metrics", get(system::metrics))
        .route("/api/config", get(config::site_config))
        .route(RECORDS_PATH, get(records::list))
        .route(RECORD_PATH, get(records::view));

    let protected = Router::new()
        .route("/api/hello", get(hello::hello))
        .route("/api/sendmail", post(mail::send_test_mail))
        .route("/api/generate", post(generate::generate))
        .route(RECORDS_PATH, post(records::create))
        .route(RECORD_PATH, patch(records::update).delete(records::delete))
        .route_layer(middleware::from_fn(require_admin_or_record_auth));

    public
        .merge(protected)
        .layer(middleware::from_fn_with_state(ctx.clone(), load_identity))
        .with_state(ctx)
}
