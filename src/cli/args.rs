use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tabletalk")]
#[command(version = "0.1.0")]
#[command(about = "Chat with your sales spreadsheet from the terminal", long_about = None)]
pub struct Cli {
    /// Backend to use (e.g., groq-llama3-70b, groq-mixtral-8x7b, openai, local)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Path to the spreadsheet (overrides configuration)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Ask one question and exit
    #[arg(short, long)]
    pub ask: Option<String>,

    /// Output format for one-shot questions
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "ask")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start a chat session (default)
    Chat,
    /// Show the column descriptions sent to the model
    Schema,
    /// List selectable backends
    Backends,
    /// Check status of dataset, configuration and credentials
    Status,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
