use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::config::Config;
use crate::error::AppResult;
use crate::services::mailer::{mailer_from_config, Mailer};
use crate::store::Store;

/// The entity store shared across request handlers.
pub type SharedStore = Arc<RwLock<Store>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: Arc<TokenService>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates state with an empty store and the given collaborators.
    /// Integration tests use this directly to inject a recording mailer.
    pub fn new(tokens: TokenService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new())),
            tokens: Arc::new(tokens),
            mailer,
        }
    }

    /// Builds state from configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::minutes(config.access_token_minutes),
            Duration::days(config.refresh_token_days),
        );
        let mailer = mailer_from_config(config)?;
        Ok(Self::new(tokens, mailer))
    }
}
