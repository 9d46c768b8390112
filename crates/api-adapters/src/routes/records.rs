//! Records API for the `posts` collection.
//!
//! Writes run the after-request audit hook once the repository accepted
//! them. A failing audit writer answers 500 but the write stays.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use axum::{Extension, Json};
use domains::{AuditAction, Identity, Post, PostDraft, PostPatch, RequestContext};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordList {
    pub page: u32,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: u32,
    pub items: Vec<Post>,
}

pub async fn list(State(ctx): State<AppContext>) -> Result<Json<RecordList>, ApiError> {
    let items = ctx.posts.list().await?;
    Ok(Json(RecordList {
        page: 1,
        per_page: items.len(),
        total_items: items.len(),
        total_pages: 1,
        items,
    }))
}

pub async fn view(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(ctx.posts.get(&id).await?))
}

pub async fn create(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<PostDraft>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(mut draft) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    draft.user = identity.user_id().map(str::to_string);

    let post = ctx.posts.create(draft, Vec::new()).await?;
    let request = request_context(method, uri.path(), identity);
    ctx.hooks.after_request(AuditAction::Insert, &post, &request).await?;
    Ok(Json(post))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(patch) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let post = ctx.posts.update(&id, patch).await?;
    let request = request_context(method, uri.path(), identity);
    ctx.hooks.after_request(AuditAction::Update, &post, &request).await?;
    Ok(Json(post))
}

pub async fn delete(
    State(ctx): State<AppContext>,
    Extension(identity): Extension<Identity>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post = ctx.posts.delete(&id).await?;
    let request = request_context(method, uri.path(), identity);
    ctx.hooks.after_request(AuditAction::Delete, &post, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn request_context(method: Method, path: &str, identity: Identity) -> RequestContext {
    RequestContext {
        method: method.to_string(),
        path: path.to_string(),
        identity,
    }
}
