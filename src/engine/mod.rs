// Gateway module for engine - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod answer;
mod llm;
mod prompt;
mod traits;

// Public re-exports - the ONLY way to access engine functionality
pub use answer::{Answer, AnswerTable};
pub use llm::LlmQueryEngine;
pub use traits::QueryEngine;
