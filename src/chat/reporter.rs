//! Result reporter: optional prose analysis of executed results.
//!
//! Issues one extra completion call with the question, the executed SQL,
//! and a compact tabular preview of the rows. Failures are swallowed;
//! the assembler falls back to a templated summary.

use std::sync::Arc;

use serde_json::Value;

use crate::llm::CompletionProvider;

use super::types::ResultSet;

/// Rows included in the tabular preview sent to the reporter prompt.
const PREVIEW_ROWS: usize = 20;

const REPORT_SYSTEM_PROMPT: &str = "You are an expert data analyst specializing in interview \
research and consumer insights. Provide clear, actionable analysis in Thai language.";

/// Generates short structured reports from query results.
pub struct ResultReporter {
    provider: Arc<dyn CompletionProvider>,
    temperature: f32,
}

impl ResultReporter {
    pub fn new(provider: Arc<dyn CompletionProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    /// Summarize a non-empty result set, or `None` when the call fails.
    ///
    /// Callers must not invoke this for empty results; an empty-result
    /// prompt has no grounding data.
    pub async fn summarize(&self, question: &str, sql: &str, result: &ResultSet) -> Option<String> {
        let prompt = build_report_prompt(question, sql, result);

        match self
            .provider
            .complete(REPORT_SYSTEM_PROMPT, &prompt, self.temperature)
            .await
        {
            Ok(report) => {
                let report = report.trim().to_string();
                if report.is_empty() {
                    None
                } else {
                    Some(report)
                }
            }
            Err(e) => {
                tracing::warn!("Report generation failed, using templated summary: {}", e);
                None
            }
        }
    }
}

fn build_report_prompt(question: &str, sql: &str, result: &ResultSet) -> String {
    format!(
        "You are a data analyst for interview research. Analyze the following query results \
         and provide a comprehensive report in Thai.\n\n\
         User Question: {}\n\n\
         SQL Query Used:\n{}\n\n\
         {}\n\n\
         Please provide:\n\
         1. **สรุปผลลัพธ์** (Summary): Brief summary of what the data shows\n\
         2. **ข้อมูลเชิงลึก** (Insights): Key insights and patterns found in the data\n\
         3. **คำแนะนำ** (Recommendations): Actionable recommendations based on the findings (if applicable)\n\n\
         Format your response in clear Thai language with proper structure and bullet points \
         where appropriate.\nKeep it concise but informative (max 300 words).",
        question,
        sql,
        render_data_summary(result)
    )
}

/// Render up to [`PREVIEW_ROWS`] rows as a markdown table.
fn render_data_summary(result: &ResultSet) -> String {
    if result.is_empty() {
        return "Query returned no results.".to_string();
    }

    let mut summary = format!("Query returned {} rows. Here are the results:\n\n", result.total);

    let preview = &result.rows[..result.rows.len().min(PREVIEW_ROWS)];
    let headers: Vec<String> = match preview.first() {
        Some(Value::Object(obj)) => obj.keys().cloned().collect(),
        _ => return summary,
    };

    summary.push_str(&format!("| {} |\n", headers.join(" | ")));
    summary.push_str(&format!(
        "|{}|\n",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));

    for row in preview {
        if let Value::Object(obj) = row {
            let values: Vec<String> = headers
                .iter()
                .map(|h| render_cell(obj.get(h).unwrap_or(&Value::Null)))
                .collect();
            summary.push_str(&format!("| {} |\n", values.join(" | ")));
        }
    }

    if result.total > PREVIEW_ROWS {
        summary.push_str(&format!("\n... and {} more rows", result.total - PREVIEW_ROWS));
    }

    summary
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
