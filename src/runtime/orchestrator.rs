use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli},
    dataset::{DatasetLoader, FieldDescriptions},
    models::ModelBackend,
    session::ChatSession,
    tui::{run_ui, ChatApp},
};

/// Main runtime orchestrator
///
/// Resolves configuration and backend from the CLI, runs subcommands, and
/// hands an assembled session to the TUI for interactive chat.
pub struct Orchestrator {
    cli: Cli,
    config: Config,
    backend: ModelBackend,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        let backend = resolve_backend(&cli, &config)?;

        Ok(Self {
            cli,
            config,
            backend,
        })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config)? {
                return Ok(()); // Command handled, exit
            }
            // Continue to chat for Commands::Chat
        }

        println!(
            "Starting TableTalk with backend: {}",
            self.backend.display_name().green()
        );

        // Probe the dataset up front; a missing file is reported but not
        // fatal, the loader reads fresh from disk on every question anyway
        probe_dataset(&self.config);

        // Built once at startup and shared read-only for the whole session
        let descriptions = Arc::new(FieldDescriptions::adventure_works());

        let session = ChatSession::start(self.config, self.backend, descriptions);
        let app = ChatApp::new(session);

        run_ui(app).await
    }
}

/// Load configuration, preferring an explicit --config file
pub(crate) fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    // CLI flags override whatever the files said
    if let Some(dataset) = &cli.dataset {
        config.dataset.path = dataset.clone();
    }
    if cli.verbose {
        config.query.verbose = true;
    }

    Ok(config)
}

/// Resolve the backend selector (CLI flag > config default)
pub(crate) fn resolve_backend(cli: &Cli, config: &Config) -> Result<ModelBackend> {
    let selector = cli.backend.as_deref().unwrap_or(&config.backend.default);
    ModelBackend::parse(selector).ok_or_else(|| {
        let known: Vec<&str> = ModelBackend::all().iter().map(|b| b.id()).collect();
        anyhow::anyhow!(
            "Unknown backend '{}' (expected one of: {})",
            selector,
            known.join(", ")
        )
    })
}

/// Report the dataset's shape, or why it could not be read
fn probe_dataset(config: &Config) {
    let mut loader = DatasetLoader::new(&config.dataset.path);
    if let Some(sheet) = &config.dataset.sheet {
        loader = loader.with_sheet(sheet);
    }
    match loader.load() {
        Ok(table) => {
            println!(
                "Loaded dataset: {} ({} rows x {} columns)",
                config.dataset.path.display(),
                table.n_rows(),
                table.n_cols()
            );
        }
        Err(e) => eprintln!("Warning: {}", e),
    }
}
