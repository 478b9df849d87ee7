//! Parley: conversational query engine for interview research data.
//!
//! Turns natural language questions (Thai or English) about an interview
//! dataset into validated, read-only SQL, executes them against SQLite,
//! and optionally summarizes the results in prose.

pub mod api;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod schema;

pub use api::{create_rest_router, ApiState, RestApiConfig};
pub use chat::{
    CandidateQuery, ChatEngine, ChatRequest, ChatResponse, Provenance, ResultSet,
    RuleBasedGenerator, StrategySelector,
};
pub use config::Config;
pub use db::QueryExecutor;
pub use error::{ParleyError, Result};
pub use llm::{CompletionProvider, MockCompletionProvider, OpenAiChatProvider};
pub use schema::{query_suggestions, TableCatalog, TableSchema};
