use axum::extract::State;
use axum::{Extension, Json};
use domains::Identity;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppContext;

/// Sends the test message to the caller and echoes it back.
pub async fn send_test_mail(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let message = ctx.mail.send_test_mail(&identity).await?;
    Ok(Json(json!({ "message": message })))
}
