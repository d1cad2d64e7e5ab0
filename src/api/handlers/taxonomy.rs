use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{Genre, Industry, StreamingPlatform};
use crate::policy::{self, Action};
use crate::store::Store;

use super::super::AppState;

// Genres, industries and streaming platforms are all id+name lookup
// tables with the same surface; the handlers are spelled out per table so
// each route stays a plain function.

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NameResponse {
    pub id: u64,
    pub name: String,
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(())
}

// Genres

pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<NameResponse>> {
    let store = state.store.read().await;
    let mut genres: Vec<NameResponse> = store
        .genres
        .values()
        .map(|g| NameResponse { id: g.id, name: g.name.clone() })
        .collect();
    genres.sort_by_key(|g| g.id);
    Json(genres)
}

pub async fn create_genre(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<NameResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let id = store.insert_genre(Genre { id: 0, name: request.name.clone() });
    Ok((StatusCode::CREATED, Json(NameResponse { id, name: request.name })))
}

pub async fn update_genre(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<NameRequest>,
) -> AppResult<Json<NameResponse>> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let genre = store
        .genres
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No genre with id {}", id)))?;
    genre.name = request.name.clone();
    Ok(Json(NameResponse { id, name: request.name }))
}

fn genre_in_use(store: &Store, id: u64) -> bool {
    store.reviews.values().any(|r| r.genre_id == id)
        || store.movies.values().any(|m| m.genre_id == id)
}

pub async fn remove_genre(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    policy::authorize(&user.0, Action::PublishContent)?;

    let mut store = state.store.write().await;
    if !store.genres.contains_key(&id) {
        return Err(AppError::NotFound(format!("No genre with id {}", id)));
    }
    if genre_in_use(&store, id) {
        return Err(AppError::Validation("Genre is referenced by existing content".to_string()));
    }
    store.genres.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// Industries

pub async fn list_industries(State(state): State<AppState>) -> Json<Vec<NameResponse>> {
    let store = state.store.read().await;
    let mut industries: Vec<NameResponse> = store
        .industries
        .values()
        .map(|i| NameResponse { id: i.id, name: i.name.clone() })
        .collect();
    industries.sort_by_key(|i| i.id);
    Json(industries)
}

pub async fn create_industry(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<NameResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let id = store.insert_industry(Industry { id: 0, name: request.name.clone() });
    Ok((StatusCode::CREATED, Json(NameResponse { id, name: request.name })))
}

pub async fn update_industry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<NameRequest>,
) -> AppResult<Json<NameResponse>> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let industry = store
        .industries
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No industry with id {}", id)))?;
    industry.name = request.name.clone();
    Ok(Json(NameResponse { id, name: request.name }))
}

fn industry_in_use(store: &Store, id: u64) -> bool {
    store.reviews.values().any(|r| r.industry_id == id)
        || store.movies.values().any(|m| m.industry_id == id)
}

pub async fn remove_industry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    policy::authorize(&user.0, Action::PublishContent)?;

    let mut store = state.store.write().await;
    if !store.industries.contains_key(&id) {
        return Err(AppError::NotFound(format!("No industry with id {}", id)));
    }
    if industry_in_use(&store, id) {
        return Err(AppError::Validation("Industry is referenced by existing content".to_string()));
    }
    store.industries.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// Streaming platforms

pub async fn list_platforms(State(state): State<AppState>) -> Json<Vec<NameResponse>> {
    let store = state.store.read().await;
    let mut platforms: Vec<NameResponse> = store
        .platforms
        .values()
        .map(|p| NameResponse { id: p.id, name: p.name.clone() })
        .collect();
    platforms.sort_by_key(|p| p.id);
    Json(platforms)
}

pub async fn create_platform(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<NameResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let id = store.insert_platform(StreamingPlatform { id: 0, name: request.name.clone() });
    Ok((StatusCode::CREATED, Json(NameResponse { id, name: request.name })))
}

pub async fn update_platform(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<NameRequest>,
) -> AppResult<Json<NameResponse>> {
    policy::authorize(&user.0, Action::PublishContent)?;
    validate_name(&request.name)?;

    let mut store = state.store.write().await;
    let platform = store
        .platforms
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No streaming platform with id {}", id)))?;
    platform.name = request.name.clone();
    Ok(Json(NameResponse { id, name: request.name }))
}

fn platform_in_use(store: &Store, id: u64) -> bool {
    store.reviews.values().any(|r| r.platform_id == id)
        || store.movies.values().any(|m| m.platform_id == id)
}

pub async fn remove_platform(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    policy::authorize(&user.0, Action::PublishContent)?;

    let mut store = state.store.write().await;
    if !store.platforms.contains_key(&id) {
        return Err(AppError::NotFound(format!("No streaming platform with id {}", id)));
    }
    if platform_in_use(&store, id) {
        return Err(AppError::Validation(
            "Streaming platform is referenced by existing content".to_string(),
        ));
    }
    store.platforms.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
