//! Environment-driven configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::system_prompt::SystemPrompts;

/// Default bound on tool-execution rounds per run
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 3;

/// Default deadline for a single model call
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
    #[error("failed to read prompt file {path}: {source}")]
    Prompt {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What the tool executor does with a call that fails or cannot be routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    /// Log and emit nothing for the call
    #[default]
    Omit,
    /// Emit a tool result carrying the error text so the model can react
    Report,
}

impl FromStr for ToolFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(Self::Omit),
            "report" => Ok(Self::Report),
            other => Err(other.to_string()),
        }
    }
}

/// Per-run orchestration settings
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Tool rounds after which the run is forced to answer
    pub max_tool_rounds: u32,
    pub model_timeout: Duration,
    pub tool_failure_policy: ToolFailurePolicy,
    pub prompts: SystemPrompts,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            tool_failure_policy: ToolFailurePolicy::default(),
            prompts: SystemPrompts::default(),
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(rounds) = parse_var::<u32>("OMNI_MAX_TOOL_ROUNDS")? {
            config.max_tool_rounds = rounds;
        }
        if let Some(secs) = parse_var::<u64>("OMNI_MODEL_TIMEOUT_SECS")? {
            config.model_timeout = Duration::from_secs(secs);
        }
        if let Ok(raw) = std::env::var("OMNI_TOOL_FAILURE_POLICY") {
            config.tool_failure_policy =
                raw.parse().map_err(|value| ConfigError::InvalidValue {
                    var: "OMNI_TOOL_FAILURE_POLICY",
                    value,
                })?;
        }
        if let Ok(dir) = std::env::var("OMNI_PROMPT_DIR") {
            config.prompts = SystemPrompts::load(dir)?;
        }

        Ok(config)
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 10800,
            upload_dir: PathBuf::from("./file"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(port) = parse_var::<u16>("OMNI_PORT")? {
            config.port = port;
        }
        if let Ok(dir) = std::env::var("OMNI_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

/// Search index connection settings
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub url: String,
    pub index: String,
    pub username: String,
    pub password: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "omni-agent-docs".to_string(),
            username: "elastic".to_string(),
            password: None,
        }
    }
}

impl IndexConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("ELASTICSEARCH_URL").unwrap_or(defaults.url),
            index: std::env::var("ELASTICSEARCH_INDEX").unwrap_or(defaults.index),
            username: std::env::var("ELASTICSEARCH_USERNAME").unwrap_or(defaults.username),
            password: std::env::var("ELASTICSEARCH_PASSWORD").ok(),
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(None),
    }
}
