//! Conversation and Training Storage
//!
//! Information Hiding:
//! - Database engine and schema hidden behind the `FaqStore` trait
//! - Handlers only see append and list operations on the two tables
//! - The in-process memory buffer lives next to it but is never persisted

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryBuffer, Turn};
pub use sqlite::SqliteStore;

/// One served question/answer exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: Option<String>,
}

/// Operator-supplied fact used to ground answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only store for conversation logs and training pairs
#[async_trait]
pub trait FaqStore: Send + Sync {
    /// Append a conversation log row, returning it with its assigned id
    async fn log_conversation(
        &self,
        question: &str,
        answer: &str,
        session_id: Option<&str>,
    ) -> StoreResult<ConversationLog>;

    /// All conversation logs, oldest first by id
    async fn list_logs(&self) -> StoreResult<Vec<ConversationLog>>;

    /// Append a training pair, returning it with its assigned id
    async fn add_training(&self, question: &str, answer: &str) -> StoreResult<TrainingPair>;

    /// All training pairs, oldest first by id
    async fn list_training(&self) -> StoreResult<Vec<TrainingPair>>;

    /// The `limit` most recently added training pairs, newest first
    async fn recent_training(&self, limit: usize) -> StoreResult<Vec<TrainingPair>>;

    async fn count_logs(&self) -> StoreResult<u64>;

    async fn count_training(&self) -> StoreResult<u64>;
}
