//! Request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Missing fields deserialize as empty so they fail validation with a
/// field-level message instead of a generic JSON error.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub question: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub id: i64,
    pub message: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub cleared_turns: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub log_count: u64,
    pub training_count: u64,
    pub memory_size: usize,
    pub memory_sessions: usize,
    pub timestamp: DateTime<Utc>,
}
