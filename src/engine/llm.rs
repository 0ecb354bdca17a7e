use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::answer::Answer;
use super::prompt::build_messages;
use super::traits::QueryEngine;
use crate::dataset::AnnotatedTable;
use crate::models::ChatModel;
use crate::query::QueryOptions;

/// Prompt-the-model reasoning engine
///
/// Renders the annotated table into prompt context, sends it with the
/// question to the chat model, and shapes the reply into an [`Answer`].
/// Repeated questions are served from a per-engine memo when
/// `enable_cache` is set; the memo is keyed on the question alone.
pub struct LlmQueryEngine {
    preview_rows: usize,
    memo: Mutex<HashMap<String, Answer>>,
}

impl LlmQueryEngine {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            preview_rows,
            memo: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl QueryEngine for LlmQueryEngine {
    async fn query(
        &self,
        table: &AnnotatedTable,
        model: &dyn ChatModel,
        options: &QueryOptions,
        question: &str,
    ) -> Result<Answer> {
        let memo_key = question.trim().to_string();
        if options.enable_cache {
            if let Some(hit) = self.memo.lock().get(&memo_key) {
                debug!("serving repeated question from cache");
                return Ok(hit.clone());
            }
        }

        // allowed_dependencies is carried for engines that execute generated
        // code; this engine only prompts, so the list passes through unused
        let messages = build_messages(table, self.preview_rows, question);
        if options.verbose {
            debug!("prompt context:\n{}", messages[0].content);
        }

        debug!("delegating question to {}", model.name());
        let response = model.chat(&messages).await?;
        let answer = Answer::from_reply(&response.content);

        if options.enable_cache {
            self.memo.lock().insert(memo_key, answer.clone());
        }

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{annotate, CellValue, FieldDescriptions, Table};
    use crate::models::{MockChatModel, ModelResponse};
    use std::sync::Arc;

    fn sample_table() -> AnnotatedTable {
        let table = Table::new(
            vec!["product_name".to_string(), "order_quantity".to_string()],
            vec![vec![
                CellValue::Text("Mountain-200".to_string()),
                CellValue::Number(3.0),
            ]],
        );
        let descriptions = Arc::new(FieldDescriptions::from_pairs([(
            "order_quantity",
            "Quantity of units sold in the order line",
        )]));
        annotate(table, descriptions)
    }

    fn replying_mock(reply: &str, times: usize) -> MockChatModel {
        let reply = reply.to_string();
        let mut mock = MockChatModel::new();
        mock.expect_name().return_const("test-model".to_string());
        mock.expect_chat().times(times).returning(move |_| {
            Ok(ModelResponse {
                content: reply.clone(),
                usage: None,
                model_name: "test-model".to_string(),
            })
        });
        mock
    }

    #[tokio::test]
    async fn test_reply_is_shaped_into_an_answer() {
        let mut mock = MockChatModel::new();
        mock.expect_name().return_const("test-model".to_string());
        mock.expect_chat()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0].content.contains("order_quantity")
                    && messages[1].content == "How many units sold?"
            })
            .returning(|_| {
                Ok(ModelResponse {
                    content: "120".to_string(),
                    usage: None,
                    model_name: "test-model".to_string(),
                })
            });

        let engine = LlmQueryEngine::new(5);
        let answer = engine
            .query(
                &sample_table(),
                &mock,
                &QueryOptions::default(),
                "How many units sold?",
            )
            .await
            .unwrap();

        assert_eq!(answer, Answer::Number(120.0));
    }

    #[tokio::test]
    async fn test_cache_off_consults_the_model_each_time() {
        let mock = replying_mock("42", 2);
        let engine = LlmQueryEngine::new(5);
        let options = QueryOptions::default();
        assert!(!options.enable_cache);

        let table = sample_table();
        engine.query(&table, &mock, &options, "q").await.unwrap();
        engine.query(&table, &mock, &options, "q").await.unwrap();
    }

    #[tokio::test]
    async fn test_cache_on_serves_repeats_without_the_model() {
        let mock = replying_mock("42", 1);
        let engine = LlmQueryEngine::new(5);
        let options = QueryOptions {
            enable_cache: true,
            ..QueryOptions::default()
        };

        let table = sample_table();
        let first = engine.query(&table, &mock, &options, "q").await.unwrap();
        let second = engine.query(&table, &mock, &options, "q").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let mut mock = MockChatModel::new();
        mock.expect_name().return_const("test-model".to_string());
        mock.expect_chat()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let engine = LlmQueryEngine::new(5);
        let result = engine
            .query(&sample_table(), &mock, &QueryOptions::default(), "q")
            .await;

        assert!(result.is_err());
    }
}
