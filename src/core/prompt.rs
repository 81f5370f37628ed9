//! Answer Generator
//!
//! Stateless with respect to conversation: the caller hands in the memory
//! turns and training pairs for every request. The provider call is bounded
//! by a timeout so a stalled upstream surfaces as `GenerationError::Timeout`.

use crate::core::llm::{ChatMessage, LlmProvider};
use crate::error::GenerationError;
use crate::storage::{TrainingPair, Turn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful FAQ chatbot assistant. \
You provide accurate, concise, and helpful answers to user questions.

Key guidelines:
1. Be helpful, friendly, and professional
2. Provide clear and accurate information
3. If you're unsure about something, acknowledge it
4. Keep responses concise but comprehensive
5. Use the conversation history to provide contextual responses
";

const TRAINING_HEADER: &str = "\n\nHere are some example Q&A pairs for reference:\n";

/// System instruction followed by the training facts, if any
pub fn system_prompt(training: &[TrainingPair]) -> String {
    let mut prompt = SYSTEM_INSTRUCTION.to_string();

    if !training.is_empty() {
        prompt.push_str(TRAINING_HEADER);
        for pair in training {
            prompt.push_str(&format!("Q: {}\nA: {}\n\n", pair.question, pair.answer));
        }
    }

    prompt
}

/// Full message list sent to the provider: system, prior turns, new question
pub fn build_messages(
    question: &str,
    memory: &[Turn],
    training: &[TrainingPair],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(memory.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt(training)));

    for turn in memory {
        messages.push(ChatMessage::user(turn.question.as_str()));
        messages.push(ChatMessage::assistant(turn.answer.as_str()));
    }

    messages.push(ChatMessage::user(question));
    messages
}

#[derive(Clone)]
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Generate an answer; the provider's text is returned verbatim
    pub async fn answer(
        &self,
        question: &str,
        memory: &[Turn],
        training: &[TrainingPair],
    ) -> Result<String, GenerationError> {
        let messages = build_messages(question, memory, training);

        tracing::debug!(
            "[AnswerGenerator] Prompt has {} memory turns and {} training pairs",
            memory.len(),
            training.len()
        );

        match timeout(self.timeout, self.provider.generate(&messages)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "[AnswerGenerator] Provider did not answer within {:?}",
                    self.timeout
                );
                Err(GenerationError::Timeout(self.timeout))
            }
        }
    }
}
