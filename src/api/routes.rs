//! HTTP route handlers.

use super::models::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::storage::{ConversationLog, TrainingPair, Turn};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

fn non_empty(field: &'static str, value: &str, message: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::validation(field, message))
    } else {
        Ok(())
    }
}

/// GET /
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Smart FAQ Chatbot API is running successfully!",
        timestamp: Utc::now(),
    })
}

/// POST /ask
///
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What are your business hours?","session_id":"web-42"}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(request) = payload?;
    non_empty("question", &request.question, "Question cannot be empty")?;

    // Logged and echoed as given; the buffer maps blank ids to the anonymous partition
    let session_id = request.session_id;

    info!(
        session = session_id.as_deref().unwrap_or("-"),
        question_preview = %request.question.chars().take(50).collect::<String>(),
        "Received question"
    );

    let memory = state.memory.read().await.turns(session_id.as_deref());
    let training = state
        .store
        .recent_training(state.training_context_pairs)
        .await?;

    let answer = state
        .generator
        .answer(&request.question, &memory, &training)
        .await?;

    state
        .memory
        .write()
        .await
        .append(session_id.as_deref(), Turn::new(&request.question, &answer));

    let log = state
        .store
        .log_conversation(&request.question, &answer, session_id.as_deref())
        .await?;

    debug!(log_id = log.id, "Answered question");

    Ok(Json(AskResponse {
        answer,
        question: request.question,
        timestamp: log.timestamp,
        session_id,
    }))
}

/// GET /logs
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<ConversationLog>>> {
    Ok(Json(state.store.list_logs().await?))
}

/// POST /train
pub async fn add_training(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> AppResult<Json<TrainResponse>> {
    let Json(request) = payload?;
    non_empty("question", &request.question, "Question cannot be empty")?;
    non_empty("answer", &request.answer, "Answer cannot be empty")?;

    let pair = state
        .store
        .add_training(&request.question, &request.answer)
        .await?;

    info!(id = pair.id, "Training pair added");

    Ok(Json(TrainResponse {
        id: pair.id,
        message: "Training data added successfully".to_string(),
        question: pair.question,
        answer: pair.answer,
    }))
}

/// GET /training
pub async fn list_training(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<TrainingPair>>> {
    Ok(Json(state.store.list_training().await?))
}

/// POST /reset, optionally `?session_id=...` to clear a single session.
/// A blank `session_id` clears the anonymous session.
pub async fn reset_memory(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResetParams>,
) -> Json<ResetResponse> {
    let mut memory = state.memory.write().await;

    let cleared_turns = match params.session_id.as_deref() {
        Some(session_id) => memory.reset_session(Some(session_id)),
        None => {
            let total = memory.len();
            memory.reset();
            total
        }
    };

    info!(cleared_turns, "Conversation memory reset");

    Json(ResetResponse {
        message: "Conversation memory reset successfully".to_string(),
        cleared_turns,
    })
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> AppResult<Json<StatusResponse>> {
    let log_count = state.store.count_logs().await?;
    let training_count = state.store.count_training().await?;

    let (memory_size, memory_sessions) = {
        let memory = state.memory.read().await;
        (memory.len(), memory.session_count())
    };

    Ok(Json(StatusResponse {
        status: "active".to_string(),
        log_count,
        training_count,
        memory_size,
        memory_sessions,
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_rejects_whitespace() {
        assert!(non_empty("question", "   \n", "Question cannot be empty").is_err());
        assert!(non_empty("question", " hi ", "Question cannot be empty").is_ok());
    }

    #[tokio::test]
    async fn test_health_response() {
        let Json(body) = health().await;
        assert_eq!(body.status, "healthy");
        assert!(body.message.contains("running"));
    }
}
