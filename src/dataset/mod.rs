// Gateway module for dataset - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod loader;
mod schema;
mod table;

// Public re-exports - the ONLY way to access dataset functionality
pub use loader::DatasetLoader;
pub use schema::{annotate, AnnotatedTable, FieldDescriptions};
pub use table::{CellValue, Table};
