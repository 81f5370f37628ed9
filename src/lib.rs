//! faqbot - FAQ chatbot REST backend
//!
//! Forwards user questions to a hosted LLM, grounding the prompt with
//! operator-supplied training pairs and the recent conversation turns, and
//! keeps a permanent log of every exchange in SQLite.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

pub use crate::api::{create_router, serve, AppState};
pub use crate::config::Settings;
pub use crate::core::{AnswerGenerator, ChatMessage, LLMClient, LlmProvider};
pub use crate::error::{AppError, GenerationError, StoreError};
pub use crate::storage::{ConversationLog, FaqStore, MemoryBuffer, SqliteStore, TrainingPair, Turn};
