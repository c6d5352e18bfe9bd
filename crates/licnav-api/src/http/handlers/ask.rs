//! POST /api/v1/ask - answer one message within an optional session.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use licnav_types::chat::{ConversationTurn, GuidanceAnswer};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    /// Continue an existing conversation. A new session is started when absent.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub answer: GuidanceAnswer,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskResponse>>, AppError> {
    let timer = RequestTimer::start();
    let result = answer(&state, request).await;

    state.metrics.record_request(timer.elapsed(), result.is_ok());
    if let Ok(response) = &result {
        state.metrics.record_usage(
            &response.answer.jurisdiction_code,
            Some(response.answer.business_type.as_key()),
        );
    }
    Ok(timer.respond(result?))
}

async fn answer(state: &AppState, request: AskRequest) -> Result<AskResponse, AppError> {
    let session_id = match request.session_id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::Validation("session_id must not be empty".to_string()));
        }
        Some(id) => id,
        None => Uuid::now_v7().to_string(),
    };

    let history = state.sessions.snapshot(&session_id).unwrap_or_default();

    let answer = state.navigator.ask(&request.message, &history).await?;

    state.sessions.record(
        &session_id,
        ConversationTurn::new(answer.query.clone(), answer.markdown.clone()),
    );
    tracing::debug!(session_id = %session_id, jurisdiction = %answer.jurisdiction_code, "answered");

    Ok(AskResponse { session_id, answer })
}
