use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::AppState;
use crate::error::AppError;
use crate::models::User;

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. Handlers take this as an argument; there is no ambient
/// current-user state anywhere.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthenticated("Expected a Bearer token".to_string()))?;

        let claims = state.tokens.validate_access(token)?;
        let user_id = claims.user_id()?;

        let store = state.store.read().await;
        let user: User = store
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthenticated("Account is disabled".to_string()));
        }

        Ok(CurrentUser(user))
    }
}
