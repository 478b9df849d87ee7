//! Conversational query pipeline.
//!
//! This module provides:
//! - Rule-based and AI-backed SQL generation behind one selection policy
//! - A read-only safety gate for generated query text
//! - Result reporting and response assembly

pub mod assembler;
pub mod engine;
pub mod generator;
pub mod reporter;
pub mod rules;
pub mod selector;
pub mod types;
pub mod validator;

pub use engine::ChatEngine;
pub use generator::AiSqlGenerator;
pub use reporter::ResultReporter;
pub use rules::RuleBasedGenerator;
pub use selector::StrategySelector;
pub use types::{CandidateQuery, ChatRequest, ChatResponse, Provenance, ResultSet};
