use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::Gender;
use crate::services::accounts::{self, NewUser};

use super::super::AppState;
use super::MessageResponse;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email_address: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

/// Token-pair response returned by both registration and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: u64,
    pub username: String,
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email_address: String,
}

// Handlers

/// Create an account and immediately issue a session.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let mut store = state.store.write().await;
    let user = accounts::register(
        &mut store,
        NewUser {
            email_address: request.email_address,
            username: request.username,
            password: request.password,
            gender: request.gender,
            country: request.country,
            profile_picture: request.profile_picture,
        },
        chrono::Utc::now(),
    )?;

    let pair = state.tokens.issue_pair(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            id: user.id,
            username: user.username,
            refresh: pair.refresh,
            access: pair.access,
        }),
    ))
}

/// Exchange credentials for a token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let store = state.store.read().await;
    let user = accounts::login(&store, &request.email_address, &request.password)?;

    let pair = state.tokens.issue_pair(&user)?;
    Ok(Json(SessionResponse {
        id: user.id,
        username: user.username,
        refresh: pair.refresh,
        access: pair.access,
    }))
}

/// Blacklist the presented refresh token, ending the session.
pub async fn logout(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    // An unparseable or expired refresh token is a bad request here, not an
    // auth failure: the caller already proved who they are.
    let claims = state
        .tokens
        .validate_refresh(&request.refresh)
        .map_err(|_| AppError::Validation("Invalid refresh token".to_string()))?;

    let mut store = state.store.write().await;
    if store.is_refresh_revoked(&request.refresh) {
        return Err(AppError::Validation("Token is already blacklisted".to_string()));
    }
    let now = chrono::Utc::now().timestamp();
    store.revoke_refresh_token(request.refresh, claims.exp, now);

    Ok(StatusCode::RESET_CONTENT)
}

/// Exchange a refresh token for a fresh access token.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let claims = state.tokens.validate_refresh(&request.refresh)?;

    let store = state.store.read().await;
    if store.is_refresh_revoked(&request.refresh) {
        return Err(AppError::Unauthenticated("Token is blacklisted".to_string()));
    }

    let user_id = claims.user_id()?;
    let user = store
        .users
        .get(&user_id)
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))?;

    let access = state.tokens.issue_access(user)?;
    Ok(Json(AccessTokenResponse { access }))
}

/// Reset a forgotten password and email the replacement.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let mut store = state.store.write().await;
    accounts::forgot_password(&mut store, state.mailer.as_ref(), &request.email_address).await?;
    Ok(Json(MessageResponse::new("New password sent to your email")))
}

/// Rotate the caller's password after verifying the old one.
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let mut store = state.store.write().await;
    accounts::change_password(
        &mut store,
        user.0.id,
        &request.old_password,
        &request.new_password,
        &request.confirm_password,
    )?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
