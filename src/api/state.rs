//! Application state shared by all handlers.

use crate::config::Settings;
use crate::core::{AnswerGenerator, LLMClient, LlmProvider};
use crate::error::StoreResult;
use crate::storage::{FaqStore, MemoryBuffer, SqliteStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct AppState {
    /// Conversation logs and training pairs
    pub store: Arc<dyn FaqStore>,

    pub generator: AnswerGenerator,

    /// Prior turns per session. Asks read a snapshot, generate without
    /// holding the lock, then append; concurrent asks may interleave.
    pub memory: RwLock<MemoryBuffer>,

    /// How many recent training pairs go into each prompt
    pub training_context_pairs: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn FaqStore>,
        provider: Arc<dyn LlmProvider>,
        settings: &Settings,
    ) -> Self {
        Self {
            store,
            generator: AnswerGenerator::new(
                provider,
                Duration::from_millis(settings.llm.timeout_ms),
            ),
            memory: RwLock::new(MemoryBuffer::new(settings.memory.max_turns)),
            training_context_pairs: settings.training.max_context_pairs,
        }
    }

    /// Open the configured database and build the production LLM client
    pub fn from_settings(settings: &Settings, api_key: String) -> StoreResult<Self> {
        let store = SqliteStore::open(&settings.database.path)?;
        let provider = LLMClient::new(api_key, settings.llm.clone());
        Ok(Self::new(Arc::new(store), Arc::new(provider), settings))
    }
}
