use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, ContentKind};
use crate::policy::{self, Action};
use crate::services::interactions;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: u64,
    pub user: u64,
    pub content_type: ContentKind,
    pub object_id: u64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub like_count: usize,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            user: comment.user_id,
            content_type: comment.target.kind,
            object_id: comment.target.id,
            body: comment.body.clone(),
            created_at: comment.created_at,
            like_count: comment.liked_by.len(),
        }
    }
}

/// List all comments, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<CommentResponse>>> {
    let store = state.store.read().await;
    let mut comments: Vec<&Comment> = store.comments.values().collect();
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = comments.into_iter().map(CommentResponse::from).collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// Fetch one comment.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<CommentResponse>> {
    let store = state.store.read().await;
    let comment = store
        .comments
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No comment with id {}", id)))?;
    Ok(Json(CommentResponse::from(comment)))
}

/// Edit a comment body. Author only (comments have no edit history).
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateCommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let mut store = state.store.write().await;
    let author = store
        .comments
        .get(&id)
        .map(|c| c.user_id)
        .ok_or_else(|| AppError::NotFound(format!("No comment with id {}", id)))?;
    policy::authorize(&user.0, Action::EditComment { author })?;

    let comment = store
        .comments
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No comment with id {}", id)))?;
    comment.body = body.to_string();
    Ok(Json(CommentResponse::from(&*comment)))
}

/// Delete a comment. Author or staff.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let author = store
        .comments
        .get(&id)
        .map(|c| c.user_id)
        .ok_or_else(|| AppError::NotFound(format!("No comment with id {}", id)))?;
    policy::authorize(&user.0, Action::DeleteComment { author })?;

    store.comments.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
}

/// Toggle a like on the comment itself.
pub async fn toggle_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<Json<ToggleLikeResponse>> {
    let mut store = state.store.write().await;
    let liked = interactions::toggle_comment_like(&mut store, id, user.0.id)?;
    Ok(Json(ToggleLikeResponse { liked }))
}
