use axum::extract::State;
use axum::{Extension, Json};
use domains::Identity;
use serde_json::{json, Value};
use services::greeting::greet;

use crate::state::AppContext;

/// `{"message": "Hello <display>", "foo": <hook var>}`
pub async fn hello(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
) -> Json<Value> {
    let message = greet(&identity).unwrap_or_else(|| "Hello".to_string());
    Json(json!({
        "message": message,
        "foo": ctx.vars.foo,
    }))
}
