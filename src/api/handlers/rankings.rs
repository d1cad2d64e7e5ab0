use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::ReviewSubject;
use crate::services::rankings;

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;
use super::reviews::{review_response, ReviewResponse};

/// Most-popular reviews: 60-day window, ranked by likes + comments.
pub async fn popular_reviews(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let store = state.store.read().await;
    let items = rankings::most_popular(&store, Utc::now())
        .into_iter()
        .map(|r| review_response(&store, r))
        .collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// Trending reviews: same ranking over the last 2 days.
pub async fn trending_reviews(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let store = state.store.read().await;
    let items = rankings::trending(&store, Utc::now())
        .into_iter()
        .map(|r| review_response(&store, r))
        .collect();
    Ok(Json(Paginated::new(&page, items)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestedQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub seed: Option<u64>,
}

/// Suggested envelope: a plain page plus the shuffle seed, so clients can
/// echo the seed back and paginate one consistent ordering.
#[derive(Debug, Serialize)]
pub struct SuggestedResponse {
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
    pub seed: u64,
    pub results: Vec<ReviewResponse>,
}

/// Same-genre suggestions for a review, in seeded-random order.
pub async fn suggested_reviews(
    State(state): State<AppState>,
    Path(review_id): Path<u64>,
    Query(query): Query<SuggestedQuery>,
) -> AppResult<Json<SuggestedResponse>> {
    let seed = query.seed.unwrap_or_else(rand::random);
    let page = PageQuery { limit: query.limit, offset: query.offset };

    let store = state.store.read().await;
    let items: Vec<ReviewResponse> = rankings::suggested(&store, review_id, seed)?
        .into_iter()
        .map(|r| review_response(&store, r))
        .collect();

    let envelope = Paginated::new(&page, items);
    Ok(Json(SuggestedResponse {
        count: envelope.count,
        limit: envelope.limit,
        offset: envelope.offset,
        seed,
        results: envelope.results,
    }))
}

/// Movie reviews only, newest first.
pub async fn movie_reviews(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let store = state.store.read().await;
    let items = rankings::by_subject(&store, ReviewSubject::Movie)
        .into_iter()
        .map(|r| review_response(&store, r))
        .collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// TV show reviews only, newest first.
pub async fn tv_show_reviews(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let store = state.store.read().await;
    let items = rankings::by_subject(&store, ReviewSubject::TvShow)
        .into_iter()
        .map(|r| review_response(&store, r))
        .collect();
    Ok(Json(Paginated::new(&page, items)))
}
