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
use crate::models::{ContentKind, ContentRef, News};
use crate::policy::{self, Action};
use crate::store::Store;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
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

pub fn news_response(store: &Store, item: &News) -> NewsResponse {
    NewsResponse {
        id: item.id,
        title: item.title.clone(),
        body: item.body.clone(),
        image: item.image.clone(),
        publisher: item.publisher_id,
        created_at: item.created_at,
        like_count: item.liked_by.len(),
        save_count: item.saved_by.len(),
        comment_count: store.comment_count(ContentRef::new(ContentKind::News, item.id)),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<NewsResponse>>> {
    let store = state.store.read().await;
    let mut items: Vec<&News> = store.news.values().collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = items.into_iter().map(|n| news_response(&store, n)).collect();
    Ok(Json(Paginated::new(&page, items)))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateNewsRequest>,
) -> AppResult<(StatusCode, Json<NewsResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;

    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let mut store = state.store.write().await;
    let id = store.insert_news(News {
        id: 0,
        title: request.title,
        body: request.body,
        image: request.image,
        publisher_id: user.0.id,
        created_at: Utc::now(),
        liked_by: HashSet::new(),
        saved_by: HashSet::new(),
    });

    let response = news_response(&store, &store.news[&id]);
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<NewsResponse>> {
    let store = state.store.read().await;
    let item = store
        .news
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No news with id {}", id)))?;
    Ok(Json(news_response(&store, item)))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateNewsRequest>,
) -> AppResult<Json<NewsResponse>> {
    let mut store = state.store.write().await;
    let current = store
        .news
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No news with id {}", id)))?;
    policy::authorize(&user.0, Action::EditContent { publisher: current.publisher_id })?;

    let item = store
        .news
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No news with id {}", id)))?;
    if let Some(title) = request.title {
        item.title = title;
    }
    if let Some(body) = request.body {
        item.body = body;
    }
    if let Some(image) = request.image {
        item.image = Some(image);
    }

    let response = news_response(&store, &store.news[&id]);
    Ok(Json(response))
}

pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let publisher = store
        .news
        .get(&id)
        .map(|n| n.publisher_id)
        .ok_or_else(|| AppError::NotFound(format!("No news with id {}", id)))?;
    policy::authorize(&user.0, Action::DeleteContent { publisher })?;

    store.delete_content(ContentRef::new(ContentKind::News, id))?;
    Ok(StatusCode::NO_CONTENT)
}
