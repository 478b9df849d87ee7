//! Error types for the Parley chat service.

use thiserror::Error;

/// Main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Completion API error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors visible at the chat boundary.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyQuestion,

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Failures while generating SQL from a question.
///
/// Never surfaced to the caller directly; the strategy selector absorbs
/// every variant by falling back to the rule-based path.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Completion service error: {0}")]
    Service(String),

    #[error("Generated query rejected: {0}")]
    Rejected(String),
}

/// Errors from the relational store.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Executor task failed: {0}")]
    Task(String),
}

/// Errors from the completion API client.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key not provided and OPENAI_API_KEY env var not set")]
    MissingApiKey,

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error: {0}")]
    Api(String),
}

/// Result type alias for Parley operations.
pub type Result<T> = std::result::Result<T, ParleyError>;
