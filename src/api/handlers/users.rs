use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, Gender, User};
use crate::policy::{self, Action};

use super::super::pagination::{PageQuery, Paginated};
use super::super::AppState;
use super::awards::{award_response, AwardResponse};
use super::comments::CommentResponse;
use super::movies::{movie_response, MovieResponse};
use super::news::{news_response, NewsResponse};
use super::reviews::{review_response, ReviewResponse};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email_address: String,
    pub username: String,
    pub gender: Gender,
    pub country: String,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email_address: user.email_address.clone(),
            username: user.username.clone(),
            gender: user.gender,
            country: user.country.clone(),
            profile_picture: user.profile_picture.clone(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub gender: Option<Gender>,
    pub country: Option<String>,
    pub profile_picture: Option<String>,
}

/// List all registered users. Staff and superusers only.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    policy::authorize(&user.0, Action::ListUsers)?;

    let store = state.store.read().await;
    let mut users: Vec<&User> = store.users.values().collect();
    users.sort_by_key(|u| u.id);
    let items = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(&page, items)))
}

/// Fetch one user's profile. Authenticated callers only.
pub async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<Json<UserResponse>> {
    let store = state.store.read().await;
    let user = store
        .users
        .get(&id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a profile. Self or staff.
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<u64>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    policy::authorize(&caller.0, Action::EditUser { subject: id })?;

    let mut store = state.store.write().await;
    if let Some(username) = &request.username {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be empty".to_string()));
        }
        let taken = store.users.values().any(|u| u.id != id && &u.username == username);
        if taken {
            return Err(AppError::Validation("Username is already in use".to_string()));
        }
    }

    let user = store
        .users
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if let Some(username) = request.username {
        user.username = username;
    }
    if let Some(gender) = request.gender {
        user.gender = gender;
    }
    if let Some(country) = request.country {
        user.country = country;
    }
    if let Some(profile_picture) = request.profile_picture {
        user.profile_picture = Some(profile_picture);
    }
    Ok(Json(UserResponse::from(&*user)))
}

/// Everything the caller has liked, saved and said, grouped per content type.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub liked_reviews: Vec<ReviewResponse>,
    pub saved_reviews: Vec<ReviewResponse>,
    pub liked_movies: Vec<MovieResponse>,
    pub saved_movies: Vec<MovieResponse>,
    pub liked_news: Vec<NewsResponse>,
    pub saved_news: Vec<NewsResponse>,
    pub liked_awards: Vec<AwardResponse>,
    pub saved_awards: Vec<AwardResponse>,
    pub comments: Vec<CommentResponse>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<DashboardResponse>> {
    let store = state.store.read().await;
    let uid = user.0.id;

    let mut comments: Vec<&Comment> =
        store.comments.values().filter(|c| c.user_id == uid).collect();
    comments.sort_by_key(|c| c.id);

    Ok(Json(DashboardResponse {
        liked_reviews: store
            .reviews
            .values()
            .filter(|r| r.liked_by.contains(&uid))
            .map(|r| review_response(&store, r))
            .collect(),
        saved_reviews: store
            .reviews
            .values()
            .filter(|r| r.saved_by.contains(&uid))
            .map(|r| review_response(&store, r))
            .collect(),
        liked_movies: store
            .movies
            .values()
            .filter(|m| m.liked_by.contains(&uid))
            .map(|m| movie_response(&store, m))
            .collect(),
        saved_movies: store
            .movies
            .values()
            .filter(|m| m.saved_by.contains(&uid))
            .map(|m| movie_response(&store, m))
            .collect(),
        liked_news: store
            .news
            .values()
            .filter(|n| n.liked_by.contains(&uid))
            .map(|n| news_response(&store, n))
            .collect(),
        saved_news: store
            .news
            .values()
            .filter(|n| n.saved_by.contains(&uid))
            .map(|n| news_response(&store, n))
            .collect(),
        liked_awards: store
            .awards
            .values()
            .filter(|a| a.liked_by.contains(&uid))
            .map(|a| award_response(&store, a))
            .collect(),
        saved_awards: store
            .awards
            .values()
            .filter(|a| a.saved_by.contains(&uid))
            .map(|a| award_response(&store, a))
            .collect(),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}
