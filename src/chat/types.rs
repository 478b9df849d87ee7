//! Types for the conversational query pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Request / Response
// ============================================================================

/// An incoming chat question.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The natural language question.
    pub message: String,
    /// Optional subset of tables to focus generation on.
    #[serde(default)]
    pub selected_tables: Option<Vec<String>>,
}

/// The answer payload returned across the chat boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Narrative answer text.
    pub response: String,
    /// The query that was executed, when one was formed.
    pub sql_query: Option<String>,
    /// Result rows, capped at 50 entries.
    pub data: Option<Vec<Value>>,
    /// Catalog payload, populated only when no query could be formed.
    pub table_info: Option<Value>,
    /// Generated analysis report, when available.
    pub report: Option<String>,
}

// ============================================================================
// Candidate Query
// ============================================================================

/// Which generation strategy produced a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the completion service.
    Ai { model: String },
    /// Produced by the keyword rule table.
    Rule,
}

impl Provenance {
    /// Short display indicator used in narrative text.
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Ai { .. } => "🤖 AI",
            Self::Rule => "📋 Rule",
        }
    }
}

/// A validated read-only query with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub sql: String,
    pub provenance: Provenance,
}

impl CandidateQuery {
    pub fn from_rule(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            provenance: Provenance::Rule,
        }
    }

    pub fn from_ai(sql: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            provenance: Provenance::Ai {
                model: model.into(),
            },
        }
    }
}

// ============================================================================
// Result Set
// ============================================================================

/// Rows returned by the executor.
///
/// `rows` is capped at the executor's limit; `total` is the true match
/// count so narrative text can still report it.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Ordered rows as column-name → value objects.
    pub rows: Vec<Value>,
    /// Total rows the query matched before capping.
    pub total: usize,
    /// True when rows were dropped to respect the cap.
    pub truncated: bool,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
