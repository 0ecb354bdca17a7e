pub mod app;
pub mod cli;
pub mod constants;
pub mod dataset;
pub mod engine;
pub mod models;
pub mod query;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use dataset::{annotate, DatasetLoader, FieldDescriptions};
pub use engine::{Answer, LlmQueryEngine, QueryEngine};
pub use models::{ModelBackend, ModelFactory};
pub use query::{QueryDelegate, QueryOptions};
pub use session::{ChatSession, Transcript};
pub use tui::run_ui;
pub use utils::TableTalkError;
