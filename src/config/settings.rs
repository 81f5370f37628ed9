use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Environment variable holding the generation provider credential
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Per-session turn cap; oldest turns are dropped first. `None` keeps everything.
    #[serde(default)]
    pub max_turns: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub max_context_pairs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                path: "logs.db".to_string(),
            },
            llm: LLMConfig {
                base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                model: "gemini-1.5-flash".to_string(),
                max_tokens: 1024,
                temperature: 0.7,
                timeout_ms: 30_000,
            },
            memory: MemoryConfig::default(),
            training: TrainingConfig {
                max_context_pairs: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());
        Self::load(File::with_name(&format!("config/{}", config_env)).required(false))
    }

    /// Load settings from an explicit file; the file must exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(File::from(path.as_ref()).required(true))
    }

    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Settings::default();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.path", defaults.database.path)?
            .set_default("llm.base_url", defaults.llm.base_url)?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("llm.max_tokens", defaults.llm.max_tokens as i64)?
            .set_default("llm.temperature", defaults.llm.temperature as f64)?
            .set_default("llm.timeout_ms", defaults.llm.timeout_ms as i64)?
            .set_default(
                "training.max_context_pairs",
                defaults.training.max_context_pairs as i64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Read the provider credential; called once at start-up
    pub fn api_key() -> Result<String> {
        validate_api_key(env::var(API_KEY_VAR).ok())
    }
}

/// A missing or blank credential is a start-up error
pub fn validate_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        Some(_) => Err(anyhow::anyhow!(
            "{} environment variable is empty",
            API_KEY_VAR
        )),
        None => Err(anyhow::anyhow!(
            "{} environment variable not set",
            API_KEY_VAR
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_config_file() {
        let settings = Settings::load(File::with_name("config/__missing__").required(false))
            .unwrap();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.database.path, "logs.db");
        assert_eq!(settings.training.max_context_pairs, 10);
        assert!(settings.memory.max_turns.is_none());
        assert!((settings.llm.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[memory]\nmax_turns = 4\n\n[llm]\nmodel = \"test-model\""
        )
        .unwrap();

        let settings = Settings::from_path(file.path()).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.memory.max_turns, Some(4));
        assert_eq!(settings.llm.model, "test-model");
        assert_eq!(settings.llm.timeout_ms, 30_000);
    }

    #[test]
    fn test_api_key_missing_is_an_error() {
        let err = validate_api_key(None).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_api_key_blank_is_an_error() {
        for blank in ["", "   ", "\t\n"] {
            let err = validate_api_key(Some(blank.to_string())).unwrap_err();
            assert!(err.to_string().contains("GOOGLE_API_KEY"));
        }
    }

    #[test]
    fn test_api_key_is_returned_unchanged() {
        let key = validate_api_key(Some("AIza-test-key".to_string())).unwrap();
        assert_eq!(key, "AIza-test-key");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::from_path("/nonexistent/faqbot.toml").is_err());
    }
}
