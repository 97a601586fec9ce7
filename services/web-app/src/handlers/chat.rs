//! Chat Handlers
//!
//! Conversation endpoints. Every change to the stored history is followed by
//! a session replay so the model context matches what the user sees.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use healthbot_models::{AskRequest, AskResponse, ChatTurn, EditMessageRequest, HistoryResponse, StatusResponse};
use healthbot_utils::{validate_message, HealthBotResult};

use crate::extract::ApiJson;
use crate::AppState;

pub const EMPTY_MESSAGE_REPLY: &str = "⚠️ Please enter a message.";
pub const FAILURE_REPLY: &str = "⚠️ Sorry, something went wrong. Please try again later.";

/// POST /ask
pub async fn ask(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AskRequest>,
) -> (StatusCode, Json<AskResponse>) {
    let message = request.message.trim();
    if message.is_empty() {
        return (StatusCode::OK, reply(EMPTY_MESSAGE_REPLY));
    }

    let mut session = state.session.lock().await;
    let turn = match session.send(&state.gemini, message).await {
        Ok(turn) => turn,
        Err(e) => {
            state.metrics.chat_failures.inc();
            tracing::error!(error = %e, "Chat request failed");
            if let Err(log_err) = state.storage.transcript.record_error(&e.to_string()).await {
                tracing::error!(error = %log_err, "Failed to write chat transcript");
            }
            return (StatusCode::BAD_GATEWAY, reply(FAILURE_REPLY));
        }
    };
    state.metrics.chat_messages.inc();

    if let Err(e) = state.storage.transcript.record_exchange(&turn.user, &turn.bot).await {
        tracing::error!(error = %e, "Failed to write chat transcript");
    }
    let answer = turn.bot.clone();
    match state.storage.history.append(turn).await {
        Ok(index) => tracing::debug!(index, "Stored chat turn"),
        // The user still gets the answer; the next replay drops the unsaved turn.
        Err(e) => tracing::error!(error = %e, "Failed to persist chat turn"),
    }
    (StatusCode::OK, reply(&answer))
}

fn reply(text: &str) -> Json<AskResponse> {
    Json(AskResponse { reply: text.to_string() })
}

/// GET /get_history
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<ChatTurn>> {
    Json(state.storage.history.all().await)
}

/// PUT /edit_message/:index
pub async fn edit_message(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    ApiJson(request): ApiJson<EditMessageRequest>,
) -> HealthBotResult<Json<HistoryResponse>> {
    let message = validate_message("message", &request.message)?;
    let history = state.storage.history.edit(index, message).await?;
    state.replay_session().await;
    Ok(Json(HistoryResponse { success: true, history }))
}

/// DELETE /delete_message/:index
pub async fn delete_message(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> HealthBotResult<Json<HistoryResponse>> {
    let history = state.storage.history.delete(index).await?;
    state.replay_session().await;
    Ok(Json(HistoryResponse { success: true, history }))
}

/// DELETE /clear_chat
pub async fn clear_chat(State(state): State<AppState>) -> HealthBotResult<Json<StatusResponse>> {
    state.storage.history.clear().await?;
    state.session.lock().await.reset();
    tracing::info!("Chat history cleared");
    Ok(Json(StatusResponse::ok("Chat history cleared")))
}
