use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppContext;

/// The public config file merged with live settings, read fresh every time.
pub async fn site_config(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    Ok(Json(ctx.site_config.load().await?))
}
