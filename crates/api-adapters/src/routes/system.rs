use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppContext;

const OPENMETRICS: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn metrics(State(ctx): State<AppContext>) -> Result<impl IntoResponse, ApiError> {
    let body = ctx
        .metrics
        .render()
        .map_err(|e| domains::DomainError::Internal(format!("encode metrics: {e}")))?;
    Ok(([(CONTENT_TYPE, OPENMETRICS)], body))
}
