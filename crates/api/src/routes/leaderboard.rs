//! Route definitions for the leaderboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::leaderboard;
use crate::state::AppState;

/// Leaderboard routes mounted at `/leaderboard`.
///
/// ```text
/// GET    /    -> get_leaderboard
/// PUT    /    -> create_session
/// POST   /    -> submit_score
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(leaderboard::get_leaderboard)
            .put(leaderboard::create_session)
            .post(leaderboard::submit_score),
    )
}
