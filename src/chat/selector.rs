//! Strategy selector: AI first when configured, rule table as fallback.

use super::generator::AiSqlGenerator;
use super::rules::RuleBasedGenerator;
use super::types::CandidateQuery;

/// Chooses which generation strategy answers a question.
///
/// The AI path runs first whenever a completion service was configured at
/// construction time; any generation or validation failure falls through
/// to the rule-based path instead of surfacing an error. `None` from
/// [`resolve`](Self::resolve) is the terminal-negative outcome, not a
/// failure.
pub struct StrategySelector {
    ai: Option<AiSqlGenerator>,
    rules: RuleBasedGenerator,
}

impl StrategySelector {
    pub fn new(ai: Option<AiSqlGenerator>, rules: RuleBasedGenerator) -> Self {
        Self { ai, rules }
    }

    /// Whether the AI path is available.
    pub fn ai_configured(&self) -> bool {
        self.ai.is_some()
    }

    /// Resolve a question to a validated candidate query, or `None` when
    /// neither strategy produced one.
    pub async fn resolve(
        &self,
        question: &str,
        focus_tables: Option<&[String]>,
    ) -> Option<CandidateQuery> {
        if let Some(ai) = &self.ai {
            match ai.generate(question, focus_tables).await {
                Ok(candidate) => {
                    tracing::debug!(sql = %candidate.sql, "AI generator produced a query");
                    return Some(candidate);
                }
                Err(e) => {
                    tracing::warn!("AI generation failed, falling back to rules: {}", e);
                }
            }
        }

        self.rules.generate(question)
    }
}
