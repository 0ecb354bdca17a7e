// Gateway module for cli - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod args;
mod commands;

// Public re-exports - the ONLY way to access cli functionality
pub use args::{Cli, Commands, OutputFormat};
pub use commands::{handle_command, show_version};
