use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::transcript::Transcript;
use crate::app::Config;
use crate::dataset::{annotate, DatasetLoader, FieldDescriptions};
use crate::engine::{Answer, LlmQueryEngine, QueryEngine};
use crate::models::{ModelBackend, ModelFactory};
use crate::query::{QueryDelegate, QueryOptions};
use crate::utils::TableTalkError;

/// One interactive chat session over the configured dataset
///
/// Holds the transcript and everything needed to assemble a turn. The
/// dataset is reloaded and the model client rebuilt on every message, so
/// spreadsheet edits and credential changes take effect between turns.
pub struct ChatSession {
    config: Config,
    backend: ModelBackend,
    loader: DatasetLoader,
    descriptions: Arc<FieldDescriptions>,
    engine: Arc<dyn QueryEngine>,
    transcript: Transcript,
}

impl ChatSession {
    /// Start a session with the default prompt-the-model engine
    pub fn start(
        config: Config,
        backend: ModelBackend,
        descriptions: Arc<FieldDescriptions>,
    ) -> Self {
        let engine = Arc::new(LlmQueryEngine::new(config.query.preview_rows));
        Self::with_engine(config, backend, descriptions, engine)
    }

    /// Start a session with a caller-supplied engine
    pub fn with_engine(
        config: Config,
        backend: ModelBackend,
        descriptions: Arc<FieldDescriptions>,
        engine: Arc<dyn QueryEngine>,
    ) -> Self {
        let mut loader = DatasetLoader::new(&config.dataset.path);
        if let Some(sheet) = &config.dataset.sheet {
            loader = loader.with_sheet(sheet);
        }
        let transcript = Transcript::new(&config.chat.system_prompt);
        Self {
            config,
            backend,
            loader,
            descriptions,
            engine,
            transcript,
        }
    }

    /// Run one full turn: reload the dataset, rebuild the model, delegate
    /// the question, and append the exchange to the transcript
    ///
    /// The user entry is appended before any fallible step, so a failed
    /// turn still records the question. No assistant entry is written on
    /// failure.
    pub async fn handle_message(&mut self, question: &str) -> Result<Answer, TableTalkError> {
        self.transcript.push_user(question);

        let table = self.loader.load()?;
        debug!(
            "loaded {} rows x {} columns from {}",
            table.n_rows(),
            table.n_cols(),
            self.loader.path().display()
        );
        let annotated = annotate(table, Arc::clone(&self.descriptions));

        let model = ModelFactory::create(self.backend, &self.config)?;

        let options = QueryOptions {
            verbose: self.config.query.verbose,
            enable_cache: self.config.query.enable_cache,
            allowed_dependencies: self.config.query.allowed_dependencies.clone(),
        };
        let delegate = QueryDelegate::new(annotated, model, Arc::clone(&self.engine), options);
        let answer = delegate.ask(question).await?;

        self.transcript.push_assistant(answer.to_string());
        Ok(answer)
    }

    /// Clear the transcript back to its system seed
    pub fn reset(&mut self) {
        self.transcript = Transcript::new(&self.config.chat.system_prompt);
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn backend(&self) -> ModelBackend {
        self.backend
    }

    pub fn descriptions(&self) -> &Arc<FieldDescriptions> {
        &self.descriptions
    }

    pub fn dataset_path(&self) -> &Path {
        self.loader.path()
    }
}
