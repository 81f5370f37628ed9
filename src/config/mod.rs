mod settings;

pub use settings::{
    DatabaseConfig, LLMConfig, LoggingConfig, MemoryConfig, ServerConfig, Settings,
    TrainingConfig, API_KEY_VAR, validate_api_key,
};
