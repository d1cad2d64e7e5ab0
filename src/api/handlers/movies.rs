use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{ContentKind, ContentRef, Movie};
use crate::policy::{self, Action};
use crate::store::Store;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub brief_description: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub cast: String,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub brief_description: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub cast: Option<String>,
    pub genre_id: Option<u64>,
    pub industry_id: Option<u64>,
    pub platform_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: u64,
    pub title: String,
    pub brief_description: String,
    pub director: String,
    pub producer: String,
    pub release_date: NaiveDate,
    pub cast: String,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
    pub publisher: u64,
    pub created_at: DateTime<Utc>,
    pub like_count: usize,
    pub save_count: usize,
    pub comment_count: usize,
}

pub fn movie_response(store: &Store, movie: &Movie) -> MovieResponse {
    MovieResponse {
        id: movie.id,
        title: movie.title.clone(),
        brief_description: movie.brief_description.clone(),
        director: movie.director.clone(),
        producer: movie.producer.clone(),
        release_date: movie.release_date,
        cast: movie.cast.clone(),
        genre_id: movie.genre_id,
        industry_id: movie.industry_id,
        platform_id: movie.platform_id,
        publisher: movie.publisher_id,
        created_at: movie.created_at,
        like_count: movie.liked_by.len(),
        save_count: movie.saved_by.len(),
        comment_count: store.comment_count(ContentRef::new(ContentKind::Movie, movie.id)),
    }
}

fn validate_taxonomy(store: &Store, genre_id: u64, industry_id: u64, platform_id: u64) -> AppResult<()> {
    if !store.genres.contains_key(&genre_id) {
        return Err(AppError::Validation(format!("Unknown genre id {}", genre_id)));
    }
    if !store.industries.contains_key(&industry_id) {
        return Err(AppError::Validation(format!("Unknown industry id {}", industry_id)));
    }
    if !store.platforms.contains_key(&platform_id) {
        return Err(AppError::Validation(format!("Unknown streaming platform id {}", platform_id)));
    }
    Ok(())
}

// Handlers

/// List movies, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<MovieResponse>>> {
    let store = state.store.read().await;
    let mut movies: Vec<&Movie> = store.movies.values().collect();
    movies.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = movies.into_iter().map(|m| movie_response(&store, m)).collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// Add a movie to the catalogue.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;

    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let mut store = state.store.write().await;
    validate_taxonomy(&store, request.genre_id, request.industry_id, request.platform_id)?;

    let id = store.insert_movie(Movie {
        id: 0,
        title: request.title,
        brief_description: request.brief_description,
        director: request.director,
        producer: request.producer,
        release_date: request.release_date,
        cast: request.cast,
        genre_id: request.genre_id,
        industry_id: request.industry_id,
        platform_id: request.platform_id,
        publisher_id: user.0.id,
        created_at: Utc::now(),
        liked_by: HashSet::new(),
        saved_by: HashSet::new(),
    });

    let response = movie_response(&store, &store.movies[&id]);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Fetch one movie.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieResponse>> {
    let store = state.store.read().await;
    let movie = store
        .movies
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No movie with id {}", id)))?;
    Ok(Json(movie_response(&store, movie)))
}

/// Partially update a movie. Publisher or staff only.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateMovieRequest>,
) -> AppResult<Json<MovieResponse>> {
    let mut store = state.store.write().await;
    let current = store
        .movies
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No movie with id {}", id)))?;
    policy::authorize(&user.0, Action::EditContent { publisher: current.publisher_id })?;

    let genre_id = request.genre_id.unwrap_or(current.genre_id);
    let industry_id = request.industry_id.unwrap_or(current.industry_id);
    let platform_id = request.platform_id.unwrap_or(current.platform_id);
    validate_taxonomy(&store, genre_id, industry_id, platform_id)?;

    let movie = store
        .movies
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No movie with id {}", id)))?;
    if let Some(title) = request.title {
        movie.title = title;
    }
    if let Some(brief_description) = request.brief_description {
        movie.brief_description = brief_description;
    }
    if let Some(director) = request.director {
        movie.director = director;
    }
    if let Some(producer) = request.producer {
        movie.producer = producer;
    }
    if let Some(release_date) = request.release_date {
        movie.release_date = release_date;
    }
    if let Some(cast) = request.cast {
        movie.cast = cast;
    }
    movie.genre_id = genre_id;
    movie.industry_id = industry_id;
    movie.platform_id = platform_id;

    let response = movie_response(&store, &store.movies[&id]);
    Ok(Json(response))
}

/// Delete a movie and its comments. Publisher or staff only.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let publisher = store
        .movies
        .get(&id)
        .map(|m| m.publisher_id)
        .ok_or_else(|| AppError::NotFound(format!("No movie with id {}", id)))?;
    policy::authorize(&user.0, Action::DeleteContent { publisher })?;

    store.delete_content(ContentRef::new(ContentKind::Movie, id))?;
    Ok(StatusCode::NO_CONTENT)
}
