use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LambdaForgeError {
    #[error("Template generation failed: {0}")]
    Generation(#[from] GeneratorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unsupported memory size: {0} MB")]
    InvalidMemory(u32),

    #[error("Unsupported timeout: {0} seconds")]
    InvalidTimeout(u32),

    #[error("Container deployment requires an image URI")]
    MissingImageUri,

    #[error("Output file already exists: {path} (use --force to overwrite)")]
    OutputExists { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error(
        "No OpenAI API key configured. Set OPENAI_API_KEY or add it to {secrets_file}"
    )]
    MissingCredential { secrets_file: PathBuf },
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response contained no completion")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LambdaForgeError>;
