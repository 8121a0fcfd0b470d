use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

/// Language model connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    /// Base URL of an OpenAI compatible API
    pub base_url: String,
    pub timeout_secs: u64,
    /// Secrets file consulted when `OPENAI_API_KEY` is not set
    pub secrets_file: Option<PathBuf>,
}

/// Where generated artifacts go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub overwrite_existing: bool,
    pub handler_file: String,
    pub improved_handler_file: String,
}

/// REST front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 120,
            secrets_file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            overwrite_existing: false,
            handler_file: "handler.py".to_string(),
            improved_handler_file: "handler_improved.py".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}
