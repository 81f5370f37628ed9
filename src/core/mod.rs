pub mod llm;
pub mod prompt;

pub use llm::{ChatMessage, LLMClient, LlmProvider};
pub use prompt::AnswerGenerator;
