use std::sync::Arc;

use vibe_store::SharedStore;

use crate::config::ServerConfig;
use crate::leaderboard::LeaderboardService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Store backend (Redis in production, in-memory for tests/dev).
    pub store: SharedStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session issuance, submission and ranking over `store`.
    pub leaderboard: Arc<LeaderboardService>,
}

impl AppState {
    /// Wire the leaderboard workflow to `store` using the configured limits.
    pub fn new(store: SharedStore, config: ServerConfig) -> Self {
        let leaderboard = Arc::new(LeaderboardService::new(
            Arc::clone(&store),
            config.rate_limit,
        ));
        Self {
            store,
            config: Arc::new(config),
            leaderboard,
        }
    }
}
