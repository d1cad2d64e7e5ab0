use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::services::interactions;

use super::super::AppState;
use super::comments::CommentResponse;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleSaveResponse {
    pub saved: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub body: String,
}

// Handlers

/// Toggle the caller's like on any content item, addressed by type tag + id.
pub async fn toggle_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((tag, object_id)): Path<(String, u64)>,
) -> AppResult<Json<ToggleLikeResponse>> {
    let mut store = state.store.write().await;
    let liked = interactions::toggle_like(&mut store, &tag, object_id, user.0.id)?;
    Ok(Json(ToggleLikeResponse { liked }))
}

/// Toggle the caller's save on any content item.
pub async fn toggle_save(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((tag, object_id)): Path<(String, u64)>,
) -> AppResult<Json<ToggleSaveResponse>> {
    let mut store = state.store.write().await;
    let saved = interactions::toggle_save(&mut store, &tag, object_id, user.0.id)?;
    Ok(Json(ToggleSaveResponse { saved }))
}

/// Comment on any content item.
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((tag, object_id)): Path<(String, u64)>,
    Json(request): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let mut store = state.store.write().await;
    let comment = interactions::add_comment(
        &mut store,
        &tag,
        object_id,
        user.0.id,
        &request.body,
        chrono::Utc::now(),
    )?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// The caller's own comments on one content item.
pub async fn my_comments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((tag, object_id)): Path<(String, u64)>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let target = interactions::parse_target(&tag, object_id)?;
    let store = state.store.read().await;
    let comments = store
        .comments_for(target)
        .into_iter()
        .filter(|c| c.user_id == user.0.id)
        .map(CommentResponse::from)
        .collect();
    Ok(Json(comments))
}
