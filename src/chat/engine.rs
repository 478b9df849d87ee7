//! Chat engine: the end-to-end conversational query pipeline.
//!
//! Each question is handled by one stateless invocation: validate input,
//! resolve a candidate query, execute it, optionally generate a report,
//! assemble the response. Nothing survives between requests except the
//! immutable catalog and the rule table.

use std::sync::Arc;

use crate::config::Config;
use crate::db::QueryExecutor;
use crate::error::{ChatError, Result};
use crate::llm::{CompletionProvider, OpenAiChatProvider};
use crate::schema::TableCatalog;

use super::assembler;
use super::generator::AiSqlGenerator;
use super::reporter::ResultReporter;
use super::rules::RuleBasedGenerator;
use super::selector::StrategySelector;
use super::types::{ChatRequest, ChatResponse};

/// Orchestrates the conversational query pipeline.
pub struct ChatEngine {
    catalog: Arc<TableCatalog>,
    selector: StrategySelector,
    executor: QueryExecutor,
    reporter: Option<ResultReporter>,
}

impl ChatEngine {
    /// Build an engine from configuration.
    ///
    /// The completion service availability is decided here, once: when no
    /// API key resolves, the engine runs rule-based only and never touches
    /// the network.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Option<Arc<dyn CompletionProvider>> = match config.resolved_api_key() {
            Some(key) => Some(Arc::new(OpenAiChatProvider::from_config(&config.llm, key)?)),
            None => {
                tracing::info!("No completion API key configured; using rule-based generation only");
                None
            }
        };

        Ok(Self::with_provider(
            provider,
            QueryExecutor::new(&config.database.path),
            config.llm.sql_temperature,
            config.llm.report_temperature,
        ))
    }

    /// Build an engine with an explicit (possibly absent) provider.
    pub fn with_provider(
        provider: Option<Arc<dyn CompletionProvider>>,
        executor: QueryExecutor,
        sql_temperature: f32,
        report_temperature: f32,
    ) -> Self {
        let catalog = Arc::new(TableCatalog::new());

        let ai = provider.as_ref().map(|p| {
            AiSqlGenerator::new(Arc::clone(p), Arc::clone(&catalog), sql_temperature)
        });
        let reporter = provider
            .as_ref()
            .map(|p| ResultReporter::new(Arc::clone(p), report_temperature));

        Self {
            catalog,
            selector: StrategySelector::new(ai, RuleBasedGenerator::new()),
            executor,
            reporter,
        }
    }

    /// Answer one question.
    ///
    /// Only two failure classes escape: an empty question and an execution
    /// error on a validated query. Everything else resolves to a response.
    pub async fn ask(&self, request: ChatRequest) -> Result<ChatResponse> {
        let question = request.message.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion.into());
        }

        let focus = request.selected_tables.as_deref();
        let Some(candidate) = self.selector.resolve(question, focus).await else {
            tracing::debug!(question, "No strategy produced a query");
            return Ok(assembler::assemble_no_query(
                self.selector.ai_configured(),
                &self.catalog,
            ));
        };

        tracing::info!(
            sql = %candidate.sql,
            provenance = candidate.provenance.indicator(),
            "Executing query"
        );
        let result = self.executor.execute_read(&candidate.sql).await?;

        if result.is_empty() {
            return Ok(assembler::assemble_empty(&candidate));
        }

        let report = match &self.reporter {
            Some(reporter) => reporter.summarize(question, &candidate.sql, &result).await,
            None => None,
        };

        Ok(assembler::assemble_success(&candidate, &result, report))
    }

    /// The shared table catalog.
    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// Whether the AI generation path is available.
    pub fn ai_configured(&self) -> bool {
        self.selector.ai_configured()
    }
}
