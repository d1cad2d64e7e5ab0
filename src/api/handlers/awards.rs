use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{Award, ContentKind, ContentRef};
use crate::policy::{self, Action};
use crate::store::Store;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAwardRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAwardRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AwardResponse {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub publisher: u64,
    pub created_at: DateTime<Utc>,
    pub like_count: usize,
    pub save_count: usize,
    pub comment_count: usize,
}

pub fn award_response(store: &Store, award: &Award) -> AwardResponse {
    AwardResponse {
        id: award.id,
        title: award.title.clone(),
        body: award.body.clone(),
        image: award.image.clone(),
        publisher: award.publisher_id,
        created_at: award.created_at,
        like_count: award.liked_by.len(),
        save_count: award.saved_by.len(),
        comment_count: store.comment_count(ContentRef::new(ContentKind::Award, award.id)),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<AwardResponse>>> {
    let store = state.store.read().await;
    let mut awards: Vec<&Award> = store.awards.values().collect();
    awards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = awards.into_iter().map(|a| award_response(&store, a)).collect();
    Ok(Json(Paginated::new(&page, items)))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateAwardRequest>,
) -> AppResult<(StatusCode, Json<AwardResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;

    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let mut store = state.store.write().await;
    let id = store.insert_award(Award {
        id: 0,
        title: request.title,
        body: request.body,
        image: request.image,
        publisher_id: user.0.id,
        created_at: Utc::now(),
        liked_by: HashSet::new(),
        saved_by: HashSet::new(),
    });

    let response = award_response(&store, &store.awards[&id]);
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<AwardResponse>> {
    let store = state.store.read().await;
    let award = store
        .awards
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No award with id {}", id)))?;
    Ok(Json(award_response(&store, award)))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateAwardRequest>,
) -> AppResult<Json<AwardResponse>> {
    let mut store = state.store.write().await;
    let current = store
        .awards
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No award with id {}", id)))?;
    policy::authorize(&user.0, Action::EditContent { publisher: current.publisher_id })?;

    let award = store
        .awards
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No award with id {}", id)))?;
    if let Some(title) = request.title {
        award.title = title;
    }
    if let Some(body) = request.body {
        award.body = body;
    }
    if let Some(image) = request.image {
        award.image = Some(image);
    }

    let response = award_response(&store, &store.awards[&id]);
    Ok(Json(response))
}

pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let publisher = store
        .awards
        .get(&id)
        .map(|a| a.publisher_id)
        .ok_or_else(|| AppError::NotFound(format!("No award with id {}", id)))?;
    policy::authorize(&user.0, Action::DeleteContent { publisher })?;

    store.delete_content(ContentRef::new(ContentKind::Award, id))?;
    Ok(StatusCode::NO_CONTENT)
}
