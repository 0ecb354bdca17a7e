use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    app::{get_config_dir, init_config, Config},
    dataset::{annotate, DatasetLoader, FieldDescriptions},
    models::ModelFactory,
};

use super::Commands;

/// Handle CLI subcommands
pub fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing TableTalk configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Schema => {
            show_schema(config)?;
            Ok(true)
        }
        Commands::Backends => {
            list_backends(config);
            Ok(true)
        }
        Commands::Status => {
            show_status(config)?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Show the column descriptions sent to the model
fn show_schema(config: &Config) -> Result<()> {
    let descriptions = FieldDescriptions::adventure_works();

    println!("Column descriptions ({} fields):", descriptions.len());
    for (name, description) in descriptions.iter() {
        println!("  • {}: {}", name.green(), description);
    }

    // Cross-check against the configured spreadsheet when it is readable
    let mut loader = DatasetLoader::new(&config.dataset.path);
    if let Some(sheet) = &config.dataset.sheet {
        loader = loader.with_sheet(sheet);
    }
    println!();
    match loader.load() {
        Ok(table) => {
            let annotated = annotate(table, Arc::new(descriptions));
            let undocumented = annotated.undocumented_columns();
            let unused = annotated.unused_descriptions();

            if undocumented.is_empty() && unused.is_empty() {
                println!("  [OK] Every column of {} is described", config.dataset.path.display());
            }
            if !undocumented.is_empty() {
                println!("  [WARNING] Columns without a description:");
                for column in undocumented {
                    println!("      • {}", column.yellow());
                }
            }
            if !unused.is_empty() {
                println!("  [WARNING] Descriptions matching no column:");
                for name in unused {
                    println!("      • {}", name.yellow());
                }
            }
        }
        Err(e) => {
            println!(
                "  [WARNING] Could not read {}: {}",
                config.dataset.path.display(),
                e
            );
        }
    }

    Ok(())
}

/// List selectable backends and their credential state
fn list_backends(config: &Config) {
    println!("Available backends:");
    for status in ModelFactory::describe(config) {
        let credential = match (&status.env_var, status.credential_present) {
            (None, _) => "no credential needed".to_string(),
            (Some(var), true) => format!("{} set", var),
            (Some(var), false) => format!("{} missing", var),
        };
        let marker = if status.credential_present || status.env_var.is_none() {
            "[OK]".green()
        } else {
            "[WARNING]".yellow()
        };
        println!(
            "  {} {} ({}) - {}",
            marker,
            status.backend.display_name(),
            status.model_id,
            credential
        );
    }
    println!();
    println!(
        "Select one with {} or the {} key in configuration.",
        "--backend".cyan(),
        "backend.default".cyan()
    );
}

/// Show version information
pub fn show_version() {
    println!("TableTalk v{}", env!("CARGO_PKG_VERSION"));
    println!("   Chat with your sales spreadsheet from the terminal");
}

/// Show status of dataset, configuration and credentials
fn show_status(config: &Config) -> Result<()> {
    println!("TableTalk Status:");
    println!();

    // Check the dataset
    let mut loader = DatasetLoader::new(&config.dataset.path);
    if let Some(sheet) = &config.dataset.sheet {
        loader = loader.with_sheet(sheet);
    }
    match loader.load() {
        Ok(table) => {
            println!(
                "  [OK] Dataset: {} ({} rows x {} columns)",
                config.dataset.path.display(),
                table.n_rows(),
                table.n_cols()
            );
        }
        Err(e) => {
            println!("  [ERROR] Dataset: {}", e);
        }
    }

    // Check configuration files
    let global_config = get_config_dir()?.join("config.toml");
    if global_config.exists() {
        println!("  [OK] Configuration: {}", global_config.display());
    } else {
        println!("  [WARNING] Configuration: Not found (using defaults)");
    }
    let local_config = PathBuf::from("tabletalk.toml");
    if local_config.exists() {
        println!("  [OK] Local overrides: {}", local_config.display());
    }

    // Check backend credentials
    for status in ModelFactory::describe(config) {
        match (&status.env_var, status.credential_present) {
            (None, _) => {
                println!(
                    "  [OK] {}: {} (no credential needed)",
                    status.backend.display_name(),
                    status.model_id
                );
            }
            (Some(var), true) => {
                println!(
                    "  [OK] {}: {} ({} set)",
                    status.backend.display_name(),
                    status.model_id,
                    var
                );
            }
            (Some(var), false) => {
                println!(
                    "  [WARNING] {}: {} (set {} to enable)",
                    status.backend.display_name(),
                    status.model_id,
                    var
                );
            }
        }
    }

    // Environment variables
    println!("\n  Environment:");
    if std::env::var(&config.backend.groq_api_key_env).is_ok() {
        println!("    • {}: Set", config.backend.groq_api_key_env);
    }
    if std::env::var(&config.backend.openai_api_key_env).is_ok() {
        println!("    • {}: Set", config.backend.openai_api_key_env);
    }

    println!();
    Ok(())
}
