use anyhow::Result;
use clap::Parser;

use tabletalk::{
    cli::Cli,
    runtime::{NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging goes to stderr so it never corrupts the TUI
    init_logger(cli.verbose);

    // Check if running in non-interactive mode
    if let Some(question) = cli.ask.clone() {
        run_one_shot(cli, question).await
    } else {
        // Create and run the orchestrator for interactive mode
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Ask one question and exit
async fn run_one_shot(cli: Cli, question: String) -> Result<()> {
    let format = cli.format;
    let mut runner = NonInteractiveRunner::from_cli(&cli)?;

    match runner.execute(&question).await {
        Ok(outcome) => {
            println!("{}", runner.format_result(&outcome, format));
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
