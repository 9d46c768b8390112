use axum::extract::State;
use axum::{Extension, Json};
use domains::{Identity, PostSummary};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppContext;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub record: PostSummary,
    pub message: &'static str,
}

pub async fn generate(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GenerateResponse>, ApiError> {
    match ctx.generation.generate(&identity).await {
        Ok(generated) => {
            ctx.metrics.post_generated();
            if generated.images_dropped {
                ctx.metrics.images_dropped();
            }
            Ok(Json(GenerateResponse {
                record: PostSummary::from(&generated.post),
                message: "Post generated successfully",
            }))
        }
        Err(err) => {
            ctx.metrics.generation_failed(err.reason());
            Err(err.into())
        }
    }
}
