use anyhow::Result;
use async_trait::async_trait;

use super::types::{ChatMessage, ModelResponse};

/// Core trait that all chat backends must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a conversation to the model and get a response
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ModelResponse>;

    /// Get the name of the underlying model
    fn name(&self) -> &str;

    /// Check if this backend runs without a hosted credential
    fn is_local(&self) -> bool;
}

impl std::fmt::Debug for dyn ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel").field("name", &self.name()).finish()
    }
}
