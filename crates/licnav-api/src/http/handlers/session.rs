//! Session HTTP handlers.
//!
//! Sessions live in memory only and disappear when the server stops or when
//! they sit idle past `server.session_idle_secs`.
//!
//! Endpoints:
//! - GET    /api/v1/sessions/{id}/history - Turns of a session
//! - DELETE /api/v1/sessions/{id}         - Forget a session

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use licnav_types::chat::ConversationTurn;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionHistory {
    pub session_id: String,
    pub turns: Vec<ConversationTurn>,
}

/// GET /api/v1/sessions/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionHistory>>, AppError> {
    let timer = RequestTimer::start();
    let turns = state
        .sessions
        .snapshot(&session_id)
        .map(|history| history.turns().to_vec())
        .ok_or_else(|| AppError::NotFound(format!("Session '{session_id}' not found")))?;

    Ok(timer.respond(SessionHistory { session_id, turns }))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let history = state
        .sessions
        .remove(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session '{session_id}' not found")))?;

    Ok(timer.respond(serde_json::json!({
        "session_id": session_id,
        "deleted": true,
        "turns": history.len(),
    })))
}
