use anyhow::Result;
use async_trait::async_trait;

use super::answer::Answer;
use crate::dataset::AnnotatedTable;
use crate::models::ChatModel;
use crate::query::QueryOptions;

/// Reasoning capability behind the query delegate
///
/// Implementations receive the annotated table, a freshly constructed chat
/// model and the forwarded options, and return a renderable answer. Failures
/// are opaque to callers; the chat boundary reports them without inspecting
/// the cause.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(
        &self,
        table: &AnnotatedTable,
        model: &dyn ChatModel,
        options: &QueryOptions,
        question: &str,
    ) -> Result<Answer>;
}
