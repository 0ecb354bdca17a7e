use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    app::Config,
    cli::{Cli, OutputFormat},
    dataset::FieldDescriptions,
    engine::Answer,
    models::ModelBackend,
    session::ChatSession,
    utils::TableTalkError,
};

use super::orchestrator::{resolve_backend, resolve_config};

/// Result of one non-interactive question
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// The question that was asked
    pub question: String,
    /// The delegate's answer
    pub answer: Answer,
    /// Metadata about the execution
    pub metadata: QueryMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Backend that answered
    pub backend: String,
    /// Dataset the question ran against
    pub dataset: String,
    /// Execution time in milliseconds
    pub duration_ms: u128,
    /// When the question was asked
    pub asked_at: DateTime<Local>,
}

/// One-shot runner behind the `--ask` flag
///
/// Runs a single session turn without the TUI and renders the outcome in
/// the requested output format.
pub struct NonInteractiveRunner {
    session: ChatSession,
    backend: ModelBackend,
    dataset: String,
}

impl NonInteractiveRunner {
    /// Create a runner from CLI args
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = resolve_config(cli)?;
        let backend = resolve_backend(cli, &config)?;
        let descriptions = Arc::new(FieldDescriptions::adventure_works());
        Ok(Self::assemble(config, backend, descriptions))
    }

    fn assemble(
        config: Config,
        backend: ModelBackend,
        descriptions: Arc<FieldDescriptions>,
    ) -> Self {
        let dataset = config.dataset.path.display().to_string();
        let session = ChatSession::start(config, backend, descriptions);
        Self {
            session,
            backend,
            dataset,
        }
    }

    /// Ask one question and return the outcome
    pub async fn execute(&mut self, question: &str) -> Result<QueryOutcome, TableTalkError> {
        let asked_at = Local::now();
        let started = Instant::now();

        let answer = self.session.handle_message(question).await?;

        Ok(QueryOutcome {
            question: question.to_string(),
            answer,
            metadata: QueryMetadata {
                backend: self.backend.id().to_string(),
                dataset: self.dataset.clone(),
                duration_ms: started.elapsed().as_millis(),
                asked_at,
            },
        })
    }

    /// Format the outcome according to the output format
    pub fn format_result(&self, outcome: &QueryOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => outcome.answer.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Question\n\n");
                output.push_str(&outcome.question);
                output.push_str("\n\n## Answer\n\n");
                output.push_str(&outcome.answer.to_string());
                output.push_str("\n\n---\n");
                output.push_str(&format!(
                    "*Backend: {} | Dataset: {} | Duration: {}ms*\n",
                    outcome.metadata.backend,
                    outcome.metadata.dataset,
                    outcome.metadata.duration_ms
                ));

                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AnnotatedTable;
    use crate::engine::QueryEngine;
    use crate::models::ChatModel;
    use crate::query::QueryOptions;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct FixedEngine(Answer);

    #[async_trait]
    impl QueryEngine for FixedEngine {
        async fn query(
            &self,
            _table: &AnnotatedTable,
            _model: &dyn ChatModel,
            _options: &QueryOptions,
            _question: &str,
        ) -> anyhow::Result<Answer> {
            Ok(self.0.clone())
        }
    }

    fn runner_with(dir: &TempDir, answer: Answer) -> NonInteractiveRunner {
        let path = dir.path().join("sales.csv");
        fs::write(&path, "product_name,total_sales\nMountain-200,1471078\n").unwrap();

        let mut config = Config::default();
        config.dataset.path = path;
        let descriptions = Arc::new(FieldDescriptions::from_pairs([(
            "product_name",
            "Name of the product sold",
        )]));
        let dataset = config.dataset.path.display().to_string();
        let session = ChatSession::with_engine(
            config,
            ModelBackend::Local,
            descriptions,
            Arc::new(FixedEngine(answer)),
        );
        NonInteractiveRunner {
            session,
            backend: ModelBackend::Local,
            dataset,
        }
    }

    #[tokio::test]
    async fn test_execute_returns_answer_and_metadata() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_with(&dir, Answer::Number(1471078.0));

        let outcome = runner.execute("What is total_sales?").await.unwrap();

        assert_eq!(outcome.question, "What is total_sales?");
        assert_eq!(outcome.answer, Answer::Number(1471078.0));
        assert_eq!(outcome.metadata.backend, "local");
        assert!(outcome.metadata.dataset.ends_with("sales.csv"));
    }

    #[tokio::test]
    async fn test_text_format_is_just_the_answer() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_with(&dir, Answer::Text("Brakes and Gears".to_string()));

        let outcome = runner.execute("Top reseller?").await.unwrap();
        let rendered = runner.format_result(&outcome, OutputFormat::Text);

        assert_eq!(rendered, "Brakes and Gears");
    }

    #[tokio::test]
    async fn test_json_format_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_with(&dir, Answer::Number(42.0));

        let outcome = runner.execute("How many resellers?").await.unwrap();
        let rendered = runner.format_result(&outcome, OutputFormat::Json);

        let parsed: QueryOutcome = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.answer, Answer::Number(42.0));
        assert_eq!(parsed.metadata.backend, "local");
    }

    #[tokio::test]
    async fn test_markdown_format_carries_question_and_footer() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_with(&dir, Answer::Number(7.0));

        let outcome = runner.execute("How many territories?").await.unwrap();
        let rendered = runner.format_result(&outcome, OutputFormat::Markdown);

        assert!(rendered.contains("## Question"));
        assert!(rendered.contains("How many territories?"));
        assert!(rendered.contains("## Answer"));
        assert!(rendered.contains("\n7"));
        assert!(rendered.contains("*Backend: local"));
    }

    #[tokio::test]
    async fn test_missing_dataset_surfaces_the_typed_error() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner_with(&dir, Answer::Number(1.0));
        fs::remove_file(dir.path().join("sales.csv")).unwrap();

        let err = runner.execute("anything").await.unwrap_err();
        assert!(matches!(err, TableTalkError::FileAccess { .. }));
    }
}
