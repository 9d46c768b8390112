//! API error types and response formatting.
//!
//! Every failure answers JSON with an `error` field, usually `details`, and
//! for persistence failures the rendered error chain under `stack`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde::Serialize;
use serde_json::Value;
use services::GenerateError;

pub const UNAUTHORIZED_DETAILS: &str =
    "The request requires admin or record authorization token to be set.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            stack: None,
        }
    }

    fn details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn stack(mut self, stack: Vec<String>) -> Self {
        self.stack = Some(stack);
        self
    }
}

fn domain_response(err: &DomainError) -> (StatusCode, ErrorBody) {
    match err {
        DomainError::NotFound(..) => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("not_found").details(err.to_string()),
        ),
        DomainError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("bad_request").details(msg.clone()),
        ),
        DomainError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("unauthorized").details(msg.clone()),
        ),
        DomainError::Configuration(msg) => {
            tracing::error!(error = %msg, "configuration error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(msg.clone()))
        }
        DomainError::Upstream { status, body } => {
            tracing::error!(status, "upstream error");
            (
                StatusCode::BAD_GATEWAY,
                ErrorBody::new("upstream_error").details(body.clone()),
            )
        }
        DomainError::UpstreamFormat(details) => {
            tracing::error!(details = %details, "unexpected upstream response");
            (
                StatusCode::BAD_GATEWAY,
                ErrorBody::new("upstream_error").details(details.clone()),
            )
        }
        DomainError::Persistence(source) => {
            tracing::error!(error = %source, "persistence error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("persistence_error")
                    .details(source.to_string())
                    .stack(err.chain()),
            )
        }
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("internal_error").details(msg.clone()),
            )
        }
    }
}

fn generate_response(err: &GenerateError) -> (StatusCode, ErrorBody) {
    match err {
        GenerateError::Configuration(msg) => {
            tracing::error!(error = %msg, "generation is not configured");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(msg.clone()))
        }
        GenerateError::Upstream { status, body } => {
            tracing::error!(status, "gemini rejected the request");
            (
                // Passthrough; a status axum cannot represent degrades to 502.
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorBody::new("Failed to generate content with Gemini API").details(body.clone()),
            )
        }
        GenerateError::UnexpectedFormat { details } => {
            tracing::error!(details = %details, "unexpected gemini response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Unexpected Gemini API response format").details(details.clone()),
            )
        }
        GenerateError::Failed(inner) => {
            tracing::error!(error = %inner, "post generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to generate post")
                    .details(inner.to_string())
                    .stack(inner.chain()),
            )
        }
    }
}

impl ApiError {
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            Self::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("unauthorized").details(msg.clone()),
            ),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("bad_request").details(msg.clone()),
            ),
            Self::Domain(err) => domain_response(err),
            Self::Generate(err) => generate_response(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
