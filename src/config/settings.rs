//! Configuration settings for the Parley server.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("parley.toml"),
            dirs::config_dir()
                .map(|p| p.join("parley/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".parley/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.database.path.is_empty() {
            return Err(ConfigError::MissingField("database.path".to_string()).into());
        }
        if self.llm.base_url.is_empty() {
            return Err(ConfigError::MissingField("llm.base_url".to_string()).into());
        }
        if self.llm.model.is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()).into());
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid("llm.timeout_secs must be > 0".to_string()).into());
        }
        Ok(())
    }

    /// Resolve the completion API key, falling back to the environment.
    ///
    /// Returns `None` when the service is unconfigured; the chat engine
    /// then runs with the rule-based generator only.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.llm
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty() && k != "your_openai_api_key_here")
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "interview_data.db".to_string(),
        }
    }
}

/// Completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL for the completion API.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// API key (loaded from environment if not set).
    pub api_key: Option<String>,
    /// Sampling temperature for SQL generation.
    pub sql_temperature: f32,
    /// Sampling temperature for report generation.
    pub report_temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            sql_temperature: 0.1,
            report_temperature: 0.3,
            timeout_secs: 30,
        }
    }
}
