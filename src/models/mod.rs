// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod backend;
mod client;
mod factory;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use backend::ModelBackend;
pub use client::OpenAiCompatModel;
pub use factory::{BackendStatus, ModelFactory};
pub use traits::ChatModel;
pub use types::{ChatMessage, MessageRole, ModelParams, ModelResponse, TokenUsage};

#[cfg(test)]
pub use traits::MockChatModel;
