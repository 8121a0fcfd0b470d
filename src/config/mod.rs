pub mod types;

use crate::error::{ConfigError, Result};
use crate::generator::FunctionConfiguration;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the model API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const APP_DIR: &str = "lambda-forge";

/// Starting point written by `lambda-forge init`
pub const SAMPLE_FUNCTION_CONFIG: &str = r#"# Function configuration for lambda-forge
handler_name = "lambda_handler"
runtime = "python3.9"
# 128, 256, 512, 1024 or 2048
memory = 256
# 5, 10, 30, 60 or 300
timeout = 30

# "S3 Upload", "API Gateway", "Scheduled Event", "SNS" or "SQS"
[trigger]
type = "S3 Upload"
bucket_name = "my-company-files"
prefix = "uploads/"

[env_vars]
ENVIRONMENT = "development"
AWS_REGION = "us-east-1"
LOG_LEVEL = "INFO"

# 0 leaves the setting out
[concurrency]
reserved = 0
provisioned = 0

[async_invoke]
max_event_age = 3600
max_retry = 2

[observability]
xray = false
log_retention = 60
log_level = "INFO"

[error_handling]
use_dlq = false
dlq_type = "SQS"
dlq_arn = ""

[vpc]
enabled = false
subnet_ids = "subnet-123,subnet-456"
security_group_ids = "sg-123"

# "zip" or "container"
[deployment]
type = "zip"
layers = ""
auto_publish = false

[secrets]
use_kms = false
kms_key_arn = ""
"#;

/// Load settings from `path`, or from the default location when present.
/// Falls back to defaults when no file exists.
pub fn load_config(path: Option<&Path>) -> Result<types::Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(p) => p,
            None => {
                log::debug!("No settings file found, using defaults");
                return Ok(types::Config::default());
            }
        },
    };

    log::debug!("Loading settings from {}", path.display());
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| {
        ConfigError::InvalidFile {
            path: path.clone(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Load a function configuration; the format follows the file extension.
pub fn load_function_config(path: &Path) -> Result<FunctionConfiguration> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let invalid = |reason: String| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        reason,
    };

    let config: FunctionConfiguration = match extension.as_str() {
        "toml" => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        "json" => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string()).into()),
    };
    Ok(config)
}

/// Resolve the model API key: environment first, then the secrets file.
pub fn resolve_api_key(llm: &types::LlmConfig) -> Result<String> {
    let secrets_file = llm
        .secrets_file
        .clone()
        .or_else(default_secrets_path)
        .unwrap_or_else(|| PathBuf::from("secrets.toml"));
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), &secrets_file)
}

fn resolve_api_key_from(env_value: Option<String>, secrets_file: &Path) -> Result<String> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        log::debug!("Using API key from {}", API_KEY_ENV);
        return Ok(key);
    }

    if secrets_file.is_file() {
        let content = fs::read_to_string(secrets_file)?;
        let secrets: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: secrets_file.to_path_buf(),
            reason: e.to_string(),
        })?;
        if let Some(key) = secrets
            .get(API_KEY_ENV)
            .and_then(|v| v.as_str())
            .filter(|k| !k.trim().is_empty())
        {
            log::debug!("Using API key from {}", secrets_file.display());
            return Ok(key.to_string());
        }
    }

    Err(ConfigError::MissingCredential {
        secrets_file: secrets_file.to_path_buf(),
    }
    .into())
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub fn default_secrets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("secrets.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LambdaForgeError;
    use crate::generator::function_config::Trigger;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(
            &path,
            "[llm]\nmodel = \"gpt-4o\"\n\n[server]\nbind = \"0.0.0.0:9000\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.output.handler_file, "handler.py");
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "[llm\nmodel = ").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(
            result,
            Err(LambdaForgeError::Config(ConfigError::InvalidFile { .. }))
        ));
    }

    #[test]
    fn test_load_function_config_formats() {
        let temp_dir = TempDir::new().unwrap();

        let toml_path = temp_dir.path().join("function.toml");
        fs::write(&toml_path, "[trigger]\ntype = \"SNS\"\ntopic_arn = \"arn:topic\"\n").unwrap();
        let config = load_function_config(&toml_path).unwrap();
        assert_eq!(
            config.trigger,
            Trigger::Sns {
                topic_arn: "arn:topic".to_string()
            }
        );

        let yaml_path = temp_dir.path().join("function.yml");
        fs::write(&yaml_path, "memory: 1024\ntrigger:\n  type: Scheduled Event\n").unwrap();
        let config = load_function_config(&yaml_path).unwrap();
        assert_eq!(config.memory, 1024);
        assert_eq!(config.trigger.label(), "Scheduled Event");

        let json_path = temp_dir.path().join("function.json");
        fs::write(&json_path, r#"{"timeout": 5}"#).unwrap();
        assert_eq!(load_function_config(&json_path).unwrap().timeout, 5);

        let ini_path = temp_dir.path().join("function.ini");
        fs::write(&ini_path, "").unwrap();
        assert!(matches!(
            load_function_config(&ini_path),
            Err(LambdaForgeError::Config(ConfigError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_sample_config_renders() {
        let config: FunctionConfiguration = toml::from_str(SAMPLE_FUNCTION_CONFIG).unwrap();
        assert_eq!(config.memory, 256);
        assert_eq!(config.env_vars.get("LOG_LEVEL"), Some("INFO"));

        let template = crate::generator::generate_sam_template(&config).unwrap();
        assert!(template.contains("my-company-files"));
        assert!(template.contains("EventInvokeConfig"));
        assert!(!template.contains("VpcConfig"));
        assert!(!template.contains("Layers"));
    }

    #[test]
    fn test_api_key_prefers_environment() {
        let temp_dir = TempDir::new().unwrap();
        let secrets = temp_dir.path().join("secrets.toml");
        fs::write(&secrets, "OPENAI_API_KEY = \"from-file\"\n").unwrap();

        let key = resolve_api_key_from(Some("from-env".to_string()), &secrets).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_api_key_falls_back_to_secrets_file() {
        let temp_dir = TempDir::new().unwrap();
        let secrets = temp_dir.path().join("secrets.toml");
        fs::write(&secrets, "OPENAI_API_KEY = \"from-file\"\n").unwrap();

        assert_eq!(resolve_api_key_from(None, &secrets).unwrap(), "from-file");
        assert_eq!(
            resolve_api_key_from(Some("  ".to_string()), &secrets).unwrap(),
            "from-file"
        );
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let secrets = temp_dir.path().join("missing.toml");

        let result = resolve_api_key_from(None, &secrets);
        assert!(matches!(
            result,
            Err(LambdaForgeError::Config(ConfigError::MissingCredential { .. }))
        ));
    }
}
