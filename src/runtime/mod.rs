// Gateway module for runtime - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod non_interactive;
mod orchestrator;

// Public re-exports - the ONLY way to access runtime functionality
pub use non_interactive::{NonInteractiveRunner, QueryMetadata, QueryOutcome};
pub use orchestrator::Orchestrator;
