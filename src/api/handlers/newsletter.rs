use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

use super::super::AppState;
use super::MessageResponse;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
}

/// Sign an email address up for the newsletter. Open to anonymous callers.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    if request.email.is_empty() || !request.email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    let mut store = state.store.write().await;
    store.subscribe_newsletter(request.email, request.first_name, chrono::Utc::now())?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Subscribed to newsletter")),
    ))
}
