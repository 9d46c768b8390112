//! Bearer token authentication middleware.
//!
//! `load_identity` runs on every request and attaches an [`Identity`]
//! extension: the resolved account, or `Anonymous` when the header is
//! missing or its token does not verify. Protected routes add
//! `require_admin_or_record_auth` on top.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use domains::Identity;

use crate::error::{ApiError, UNAUTHORIZED_DETAILS};
use crate::state::AppContext;

pub async fn load_identity(
    State(ctx): State<AppContext>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = match header.and_then(auth_adapters::bearer_token) {
        Some(token) => ctx.identity.resolve(token).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "ignoring invalid bearer token");
            Identity::Anonymous
        }),
        None => Identity::Anonymous,
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Rejects requests without an admin or record identity.
pub async fn require_admin_or_record_auth(request: Request, next: Next) -> Result<Response, ApiError> {
    let authenticated = request
        .extensions()
        .get::<Identity>()
        .is_some_and(Identity::is_authenticated);

    if !authenticated {
        tracing::debug!(path = %request.uri().path(), "missing admin or record authorization");
        return Err(ApiError::Unauthorized(UNAUTHORIZED_DETAILS.to_string()));
    }
    Ok(next.run(request).await)
}
