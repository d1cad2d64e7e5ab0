pub mod auth;
pub mod awards;
pub mod comments;
pub mod interactions;
pub mod movies;
pub mod news;
pub mod newsletter;
pub mod rankings;
pub mod reviews;
pub mod taxonomy;
pub mod users;

use axum::http::StatusCode;
use serde::Serialize;

/// Plain `{"message": ...}` body for operations with nothing else to say.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
