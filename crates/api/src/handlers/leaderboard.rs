//! Handlers for the `/leaderboard` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vibe_core::leaderboard::{LeaderboardEntry, ScoreUpdate};

use crate::error::{AppError, AppResult};
use crate::leaderboard::{IssuedSession, SessionRequest, Submission};
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /leaderboard`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub original_prompt: String,
    #[serde(default)]
    pub user_prompt: String,
}

/// Request body for `POST /leaderboard`.
///
/// `score` stays a raw JSON value so every malformed score is reported as
/// `INVALID_SCORE` rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: serde_json::Value,
    #[serde(default)]
    pub session_token: String,
    #[serde(default)]
    pub game_data: Option<serde_json::Value>,
}

/// Response body for `GET /leaderboard`.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Response body for a successful `POST /leaderboard`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub success: bool,
    pub updated: bool,
    #[serde(flatten)]
    pub update: ScoreUpdate,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/leaderboard
///
/// Top 100 names by cumulative score. Never fails; an unreachable store
/// yields an empty board.
pub async fn get_leaderboard(State(state): State<AppState>) -> Json<LeaderboardResponse> {
    let leaderboard = state.leaderboard.top_entries().await;
    Json(LeaderboardResponse { leaderboard })
}

/// PUT /api/leaderboard
///
/// Issue a single-use game session for the calling IP.
pub async fn create_session(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> AppResult<Json<IssuedSession>> {
    let Json(input) = payload.map_err(reject_body)?;
    let request = SessionRequest {
        game_type: input.game_type,
        original_prompt: input.original_prompt,
        user_prompt: input.user_prompt,
    };
    let issued = state.leaderboard.issue_session(request, &ip).await?;
    Ok(Json(issued))
}

/// POST /api/leaderboard
///
/// Submit a score against a previously issued session.
pub async fn submit_score(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> AppResult<Json<SubmitScoreResponse>> {
    let Json(input) = payload.map_err(reject_body)?;
    let submission = Submission {
        name: input.name,
        score: input.score,
        session_token: input.session_token,
        game_data: input.game_data,
    };
    let update = state.leaderboard.submit_score(submission, &ip).await?;

    Ok(Json(SubmitScoreResponse {
        success: true,
        updated: true,
        update,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Report body extraction failures in the standard JSON error shape.
fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
