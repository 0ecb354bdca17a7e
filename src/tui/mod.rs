// Gateway module for tui - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod app;
mod render;
mod ui;

// Public re-exports - the ONLY way to access tui functionality
pub use app::{ChatApp, StatusLine};
pub use ui::run_ui;
