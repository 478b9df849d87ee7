//! AI-backed SQL generator.
//!
//! Builds a schema-grounded prompt, requests one completion, strips any
//! code-fence markup from the answer, and applies the read-only gate.
//! Every failure is returned as a [`GenerationError`]; retry policy
//! belongs to the strategy selector, never to this module.

use std::sync::Arc;

use crate::error::{GenerationError, ParleyError};
use crate::llm::CompletionProvider;
use crate::schema::TableCatalog;

use super::types::CandidateQuery;
use super::validator;

const SYSTEM_PROMPT: &str = "\
You are an expert SQL query generator for an interview database.
Your task is to convert natural language questions (in Thai or English) into valid SQLite queries.

Rules:
1. Generate ONLY the SQL query, no explanations
2. Use proper SQLite syntax
3. Always use table aliases for clarity
4. Use JOINs when querying multiple tables
5. Include ORDER BY when using LIMIT
6. For Thai questions, search in Thai text fields (fields ending with _th or containing Thai data)
7. Use COUNT(DISTINCT interview_id) to count unique people
8. Return only SELECT queries (no INSERT, UPDATE, DELETE)
9. Limit results to 100 rows maximum for safety
10. Use proper aggregation functions (COUNT, AVG, SUM, etc.)

Examples:

Question: \"มีกี่คนที่สัมภาษณ์?\"
SQL: SELECT COUNT(*) as total_interviews FROM interviews;

Question: \"อายุเฉลี่ยของผู้ให้สัมภาษณ์?\"
SQL: SELECT AVG(age) as average_age FROM personas WHERE age IS NOT NULL;

Question: \"Theme ไหนที่ positive มากที่สุด?\"
SQL: SELECT t.theme_name_th, COUNT(*) as mention_count FROM interview_themes it JOIN themes t ON it.theme_id = t.theme_id WHERE it.sentiment = 'Positive' GROUP BY t.theme_id ORDER BY mention_count DESC LIMIT 10;

Now generate SQL for the following question:";

/// SQL generator backed by the completion service.
pub struct AiSqlGenerator {
    provider: Arc<dyn CompletionProvider>,
    catalog: Arc<TableCatalog>,
    temperature: f32,
}

impl AiSqlGenerator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        catalog: Arc<TableCatalog>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            catalog,
            temperature,
        }
    }

    /// Generate and validate one candidate query for the question.
    pub async fn generate(
        &self,
        question: &str,
        focus_tables: Option<&[String]>,
    ) -> Result<CandidateQuery, GenerationError> {
        let system = self.build_system_prompt(focus_tables);

        let completion = self
            .provider
            .complete(&system, question, self.temperature)
            .await
            .map_err(|e| match e {
                ParleyError::Llm(llm) => GenerationError::Service(llm.to_string()),
                other => GenerationError::Service(other.to_string()),
            })?;

        let sql = validator::strip_code_fence(&completion);
        validator::validate(&sql).map_err(|reason| GenerationError::Rejected(reason.to_string()))?;

        Ok(CandidateQuery::from_ai(sql, self.provider.model()))
    }

    fn build_system_prompt(&self, focus_tables: Option<&[String]>) -> String {
        let mut prompt = format!("{}\n\n{}", SYSTEM_PROMPT, self.catalog.as_prompt_text());
        if let Some(tables) = focus_tables {
            if !tables.is_empty() {
                prompt.push_str(&format!("\n\nFocus on these tables: {}\n", tables.join(", ")));
            }
        }
        prompt
    }
}
