//! # Function Configuration
//!
//! Typed description of a single serverless function as collected from the
//! user. Every optional section is an `Option`, so a section that is missing
//! from the input file simply means the feature is disabled.

use crate::error::GeneratorError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Memory sizes (MB) the generator accepts
pub const MEMORY_OPTIONS: [u32; 5] = [128, 256, 512, 1024, 2048];

/// Timeouts (seconds) the generator accepts
pub const TIMEOUT_OPTIONS: [u32; 5] = [5, 10, 30, 60, 300];

pub const DEFAULT_HANDLER_NAME: &str = "lambda_handler";
pub const DEFAULT_RUNTIME: &str = "python3.9";

/// Complete configuration of the function to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfiguration {
    pub handler_name: String,
    pub runtime: String,
    pub memory: u32,
    pub timeout: u32,
    pub trigger: Trigger,
    pub env_vars: EnvVars,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<ConcurrencyConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_invoke: Option<AsyncInvokeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<VpcConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_handling: Option<ErrorHandlingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsConfig>,
}

impl Default for FunctionConfiguration {
    fn default() -> Self {
        Self {
            handler_name: DEFAULT_HANDLER_NAME.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            memory: 256,
            timeout: 30,
            trigger: Trigger::default(),
            env_vars: EnvVars::for_environment("development", LogLevel::Info),
            concurrency: None,
            async_invoke: None,
            vpc: None,
            observability: None,
            error_handling: None,
            deployment: None,
            secrets: None,
        }
    }
}

impl FunctionConfiguration {
    /// Reject values the form would never offer.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !MEMORY_OPTIONS.contains(&self.memory) {
            return Err(GeneratorError::InvalidMemory(self.memory));
        }
        if !TIMEOUT_OPTIONS.contains(&self.timeout) {
            return Err(GeneratorError::InvalidTimeout(self.timeout));
        }
        if let Some(deployment) = &self.deployment {
            if deployment.kind == DeploymentType::Container && deployment.ecr_uri.is_empty() {
                return Err(GeneratorError::MissingImageUri);
            }
        }
        Ok(())
    }

    /// Variables as deployed. A configured log level replaces `LOG_LEVEL`
    /// unless the variable was given a non-default value by hand.
    pub fn environment(&self) -> EnvVars {
        let mut vars = self.env_vars.clone();
        if let Some(observability) = &self.observability {
            let explicit = vars
                .get("LOG_LEVEL")
                .is_some_and(|level| level != LogLevel::default().as_str());
            if !explicit {
                vars.insert("LOG_LEVEL", observability.log_level.as_str());
            }
        }
        vars
    }

    pub fn is_container(&self) -> bool {
        matches!(
            &self.deployment,
            Some(DeploymentConfig { kind: DeploymentType::Container, .. })
        )
    }
}

/// Event source that invokes the function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Trigger {
    #[serde(rename = "S3 Upload")]
    S3Upload {
        bucket_name: String,
        #[serde(default)]
        prefix: String,
    },
    #[serde(rename = "API Gateway")]
    ApiGateway {
        #[serde(default = "default_route")]
        route: String,
        #[serde(default)]
        http_method: HttpMethod,
    },
    #[serde(rename = "Scheduled Event")]
    Scheduled {
        #[serde(default = "default_schedule_expression")]
        schedule_expression: String,
    },
    #[serde(rename = "SNS")]
    Sns {
        #[serde(default)]
        topic_arn: String,
    },
    #[serde(rename = "SQS")]
    Sqs {
        #[serde(default)]
        queue_arn: String,
        #[serde(default = "default_batch_size")]
        batch_size: u32,
    },
}

fn default_route() -> String {
    "/".to_string()
}

fn default_schedule_expression() -> String {
    "rate(5 minutes)".to_string()
}

fn default_batch_size() -> u32 {
    10
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::S3Upload {
            bucket_name: "my-company-files".to_string(),
            prefix: String::new(),
        }
    }
}

impl Trigger {
    /// Human readable name, as shown to the user and sent to the model
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::S3Upload { .. } => "S3 Upload",
            Trigger::ApiGateway { .. } => "API Gateway",
            Trigger::Scheduled { .. } => "Scheduled Event",
            Trigger::Sns { .. } => "SNS",
            Trigger::Sqs { .. } => "SQS",
        }
    }

    /// Whether the event source invokes the function asynchronously.
    /// Only these honor event age and retry settings.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            Trigger::S3Upload { .. } | Trigger::Scheduled { .. } | Trigger::Sns { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment variables in the order they were declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars(Vec<(String, String)>);

impl EnvVars {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The variables the generator form pre-fills.
    pub fn for_environment(environment: &str, log_level: LogLevel) -> Self {
        let mut vars = Self::new();
        vars.insert("ENVIRONMENT", environment);
        vars.insert("AWS_REGION", "us-east-1");
        vars.insert("LOG_LEVEL", log_level.as_str());
        vars
    }

    /// Insert or replace a variable. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = EnvVars::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

impl Serialize for EnvVars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EnvVars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EnvVarsVisitor;

        impl<'de> Visitor<'de> for EnvVarsVisitor {
            type Value = EnvVars;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of environment variable names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EnvVars, A::Error> {
                let mut vars = EnvVars::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    vars.insert(key, value);
                }
                Ok(vars)
            }
        }

        deserializer.deserialize_map(EnvVarsVisitor)
    }
}

/// Zero means "not configured" for both values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub reserved: u32,
    pub provisioned: u32,
}

/// Event age and retry limits for asynchronous invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncInvokeConfig {
    pub max_event_age: u32,
    pub max_retry: u32,
}

impl Default for AsyncInvokeConfig {
    fn default() -> Self {
        Self {
            max_event_age: 3600,
            max_retry: 2,
        }
    }
}

/// Network placement. Id lists are comma separated and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcConfig {
    pub enabled: bool,
    pub subnet_ids: String,
    pub security_group_ids: String,
    pub subnet_type: SubnetType,
    pub needs_internet: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetType {
    #[default]
    Private,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub xray: bool,
    /// CloudWatch retention in days
    pub log_retention: u32,
    pub log_level: LogLevel,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            xray: false,
            log_retention: 60,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    pub use_dlq: bool,
    pub dlq_type: DlqType,
    pub dlq_arn: String,
    pub create_alarm: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DlqType {
    #[default]
    Sqs,
    Sns,
}

impl DlqType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DlqType::Sqs => "SQS",
            DlqType::Sns => "SNS",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    #[serde(rename = "type")]
    pub kind: DeploymentType,
    /// Image location, required for container deployments
    pub ecr_uri: String,
    /// Layer ARNs, one per line. Ignored for container deployments.
    pub layers: String,
    pub auto_publish: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentType {
    #[default]
    Zip,
    Container,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub use_kms: bool,
    pub kms_key_arn: String,
    pub secrets_manager: bool,
    pub parameter_store: bool,
}
