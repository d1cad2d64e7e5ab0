use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> AppResult<u64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthenticated("Invalid token subject".to_string()))
    }
}

/// An access/refresh token pair issued at login or registration.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and validates bearer tokens (HS256).
///
/// Keys live on this service and the service lives in application state;
/// nothing token-related is process-global.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    fn issue(&self, user: &User, token_type: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: token_type.to_string(),
            email: user.email_address.clone(),
            username: user.username.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn issue_access(&self, user: &User) -> AppResult<String> {
        self.issue(user, "access", self.access_ttl)
    }

    pub fn issue_refresh(&self, user: &User) -> AppResult<String> {
        self.issue(user, "refresh", self.refresh_ttl)
    }

    pub fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue_access(user)?,
            refresh: self.issue_refresh(user)?,
        })
    }

    /// Validate signature and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthenticated("Invalid or expired token".to_string()))
    }

    /// Validate an access token specifically.
    pub fn validate_access(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate(token)?;
        if claims.token_type != "access" {
            return Err(AppError::Unauthenticated("Not an access token".to_string()));
        }
        Ok(claims)
    }

    /// Validate a refresh token specifically.
    pub fn validate_refresh(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate(token)?;
        if claims.token_type != "refresh" {
            return Err(AppError::Unauthenticated("Not a refresh token".to_string()));
        }
        Ok(claims)
    }
}
