//! Read-only safety gate for candidate query text.

use thiserror::Error;

/// Why a candidate query was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Candidate query is empty")]
    Empty,

    #[error("Only SELECT queries are allowed")]
    NotReadOnly,
}

/// Strip surrounding markdown code-fence markup from completion output.
///
/// Handles both ```sql and bare ``` fences; text without fences passes
/// through trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut inner = trimmed.trim_start_matches("```");
    if let Some(rest) = inner.strip_prefix("sql") {
        inner = rest;
    }
    inner.trim_end_matches("```").trim().to_string()
}

/// Enforce the read-only invariant on a candidate query string.
///
/// The trimmed, case-folded text must be non-empty and begin with SELECT.
/// This is deliberately a prefix check, not a parser: it blocks mutating
/// statements but does not inspect the query body.
pub fn validate(text: &str) -> Result<(), RejectReason> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RejectReason::Empty);
    }
    if !trimmed.to_uppercase().starts_with("SELECT") {
        return Err(RejectReason::NotReadOnly);
    }
    Ok(())
}
