use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_LOCAL_BASE_URL, DEFAULT_LOCAL_MODEL, DEFAULT_MAX_TOKENS,
    DEFAULT_OPENAI_MODEL, DEFAULT_PREVIEW_ROWS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P, GROQ_API_KEY_ENV, OPENAI_API_KEY_ENV,
};
use crate::models::ModelBackend;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Backend selection and credentials
    #[serde(default)]
    pub backend: BackendConfig,

    /// Generation parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Query engine knobs
    #[serde(default)]
    pub query: QueryConfig,

    /// Chat session settings
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            backend: BackendConfig::default(),
            model: ModelConfig::default(),
            query: QueryConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the spreadsheet
    pub path: PathBuf,
    /// Worksheet to read; first sheet when unset
    pub sheet: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
            sheet: None,
        }
    }
}

/// Backend selection and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend used when the CLI does not name one
    pub default: String,
    /// Environment variable containing the Groq API key
    pub groq_api_key_env: String,
    /// Environment variable containing the OpenAI API key
    pub openai_api_key_env: String,
    /// Model requested from OpenAI
    pub openai_model: String,
    /// Base URL of the locally served endpoint
    pub local_base_url: String,
    /// Model requested from the local endpoint
    pub local_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            default: ModelBackend::default().id().to_string(),
            groq_api_key_env: GROQ_API_KEY_ENV.to_string(),
            openai_api_key_env: OPENAI_API_KEY_ENV.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            local_base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Nucleus sampling cutoff
    pub top_p: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// Query engine knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Log prompt context on every question
    pub verbose: bool,
    /// Memoize repeated questions
    pub enable_cache: bool,
    /// Modules an execution-backed engine may import
    pub allowed_dependencies: Vec<String>,
    /// Rows of the table shown to the model
    pub preview_rows: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            enable_cache: false,
            allowed_dependencies: vec!["collections".to_string()],
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Chat session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// System entry every transcript starts with
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    // Get config directories
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from("tabletalk.toml");

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Add global config if it exists
    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    // Add local config if it exists
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // Add environment variables (TABLETALK_ prefix)
    figment = figment.merge(Env::prefixed("TABLETALK_"));

    // Extract and return config
    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TABLETALK_"))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tabletalk") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("tabletalk");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        let default_config = Config::default();
        save_config(&default_config, Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    // Create example local config
    let local_example = PathBuf::from("tabletalk.toml.example");
    if !local_example.exists() {
        let example_config = r#"# TableTalk Project Configuration
# This file overrides global settings for this directory

[dataset]
path = "adventureworks_2022_denormalized.xlsx"

[backend]
default = "groq-llama3-70b"

[query]
verbose = true
enable_cache = false
preview_rows = 5
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
