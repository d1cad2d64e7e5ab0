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
use crate::models::{rating_in_range, ContentKind, ContentRef, Review, ReviewSubject};
use crate::policy::{self, Action};
use crate::store::Store;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub title: String,
    pub subject: ReviewSubject,
    pub body: String,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub verdict: String,
    pub rating: f64,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub subject: Option<ReviewSubject>,
    pub body: Option<String>,
    pub cast: Option<String>,
    pub director: Option<String>,
    pub verdict: Option<String>,
    pub rating: Option<f64>,
    pub genre_id: Option<u64>,
    pub industry_id: Option<u64>,
    pub platform_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: u64,
    pub title: String,
    pub subject: ReviewSubject,
    pub body: String,
    pub cast: String,
    pub director: String,
    pub verdict: String,
    pub rating: f64,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
    pub publisher: u64,
    pub created_at: DateTime<Utc>,
    pub like_count: usize,
    pub save_count: usize,
    pub comment_count: usize,
}

/// Builds the response shape, folding in the interaction counts.
pub fn review_response(store: &Store, review: &Review) -> ReviewResponse {
    ReviewResponse {
        id: review.id,
        title: review.title.clone(),
        subject: review.subject,
        body: review.body.clone(),
        cast: review.cast.clone(),
        director: review.director.clone(),
        verdict: review.verdict.clone(),
        rating: review.rating,
        genre_id: review.genre_id,
        industry_id: review.industry_id,
        platform_id: review.platform_id,
        publisher: review.publisher_id,
        created_at: review.created_at,
        like_count: review.liked_by.len(),
        save_count: review.saved_by.len(),
        comment_count: store.comment_count(ContentRef::new(ContentKind::Review, review.id)),
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

fn validate_rating(rating: f64) -> AppResult<()> {
    if rating_in_range(rating) {
        Ok(())
    } else {
        Err(AppError::Validation("Rating must be between 1.0 and 10.0".to_string()))
    }
}

// Handlers

/// List reviews, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let store = state.store.read().await;
    let mut reviews: Vec<&Review> = store.reviews.values().collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = reviews.into_iter().map(|r| review_response(&store, r)).collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// Publish a review.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    policy::authorize(&user.0, Action::PublishContent)?;

    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    validate_rating(request.rating)?;

    let mut store = state.store.write().await;
    validate_taxonomy(&store, request.genre_id, request.industry_id, request.platform_id)?;

    let id = store.insert_review(Review {
        id: 0,
        title: request.title,
        subject: request.subject,
        body: request.body,
        cast: request.cast,
        director: request.director,
        verdict: request.verdict,
        rating: request.rating,
        genre_id: request.genre_id,
        industry_id: request.industry_id,
        platform_id: request.platform_id,
        publisher_id: user.0.id,
        created_at: Utc::now(),
        liked_by: HashSet::new(),
        saved_by: HashSet::new(),
    });

    let response = review_response(&store, &store.reviews[&id]);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Fetch one review.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ReviewResponse>> {
    let store = state.store.read().await;
    let review = store
        .reviews
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No review with id {}", id)))?;
    Ok(Json(review_response(&store, review)))
}

/// Partially update a review. Publisher or staff only.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    if let Some(rating) = request.rating {
        validate_rating(rating)?;
    }

    let mut store = state.store.write().await;
    let current = store
        .reviews
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No review with id {}", id)))?;
    policy::authorize(&user.0, Action::EditContent { publisher: current.publisher_id })?;

    let genre_id = request.genre_id.unwrap_or(current.genre_id);
    let industry_id = request.industry_id.unwrap_or(current.industry_id);
    let platform_id = request.platform_id.unwrap_or(current.platform_id);
    validate_taxonomy(&store, genre_id, industry_id, platform_id)?;

    let review = store
        .reviews
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("No review with id {}", id)))?;
    if let Some(title) = request.title {
        review.title = title;
    }
    if let Some(subject) = request.subject {
        review.subject = subject;
    }
    if let Some(body) = request.body {
        review.body = body;
    }
    if let Some(cast) = request.cast {
        review.cast = cast;
    }
    if let Some(director) = request.director {
        review.director = director;
    }
    if let Some(verdict) = request.verdict {
        review.verdict = verdict;
    }
    if let Some(rating) = request.rating {
        review.rating = rating;
    }
    review.genre_id = genre_id;
    review.industry_id = industry_id;
    review.platform_id = platform_id;

    let response = review_response(&store, &store.reviews[&id]);
    Ok(Json(response))
}

/// Delete a review and its comments. Publisher or staff only.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<StatusCode> {
    let mut store = state.store.write().await;
    let publisher = store
        .reviews
        .get(&id)
        .map(|r| r.publisher_id)
        .ok_or_else(|| AppError::NotFound(format!("No review with id {}", id)))?;
    policy::authorize(&user.0, Action::DeleteContent { publisher })?;

    store.delete_content(ContentRef::new(ContentKind::Review, id))?;
    Ok(StatusCode::NO_CONTENT)
}
