use std::sync::Arc;

use tracing::error;

use agora_db::{Database, StoreResult};

use crate::error::ApiError;
use crate::token::TokenKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenKeys,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenKeys) -> AppState {
        Arc::new(Self { db, tokens })
    }
}

/// Run a store call off the async runtime. SQLite calls block.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
        .map_err(ApiError::from)
}
