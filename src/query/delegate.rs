use std::sync::Arc;

use tracing::debug;

use super::options::QueryOptions;
use crate::dataset::AnnotatedTable;
use crate::engine::{Answer, QueryEngine};
use crate::models::ChatModel;
use crate::utils::TableTalkError;

/// One-turn binding of table, model, engine and options
///
/// Assembled fresh for every question from that turn's reloaded table and
/// newly constructed model. The engine is shared so its memo survives turns.
pub struct QueryDelegate {
    table: AnnotatedTable,
    model: Box<dyn ChatModel>,
    engine: Arc<dyn QueryEngine>,
    options: QueryOptions,
}

impl QueryDelegate {
    pub fn new(
        table: AnnotatedTable,
        model: Box<dyn ChatModel>,
        engine: Arc<dyn QueryEngine>,
        options: QueryOptions,
    ) -> Self {
        Self {
            table,
            model,
            engine,
            options,
        }
    }

    /// Delegate one question to the engine
    ///
    /// Engine failures flatten into an opaque query error; callers report
    /// the message without inspecting the cause.
    pub async fn ask(&self, question: &str) -> Result<Answer, TableTalkError> {
        debug!("delegating question: {}", question);
        self.engine
            .query(&self.table, self.model.as_ref(), &self.options, question)
            .await
            .map_err(|e| TableTalkError::QueryExecution {
                message: format!("{e:#}"),
            })
    }
}
