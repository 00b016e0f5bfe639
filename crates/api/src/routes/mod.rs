pub mod health;
pub mod leaderboard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /leaderboard        GET  top 100 entries
///                     PUT  issue a game session
///                     POST submit a score
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/leaderboard", leaderboard::router())
}
