// Gateway module for session - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod adapter;
mod transcript;

// Public re-exports - the ONLY way to access session functionality
pub use adapter::ChatSession;
pub use transcript::Transcript;
