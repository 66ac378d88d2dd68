// ABOUTME: Entry point for the cfkit CLI application.
// ABOUTME: Parses arguments, sets up logging, and dispatches to command handlers.

mod cli;
mod commands;

use cfkit::config::{self, Config};
use cfkit::error::Result;
use cfkit::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli, &mut output).await {
        output.error(&cfkit::error::format_error_chain(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;

    if let Commands::Init { target, app, force } = &cli.command {
        config::init_config(&cwd, target.as_deref(), app.as_deref(), *force)?;
        output.success(&format!("Wrote {}", config::CONFIG_FILENAME));
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&cwd)?,
    };

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Login => commands::login(&config, output).await,
        Commands::Orgs => commands::orgs(&config, output).await,
        Commands::Spaces { org } => commands::spaces(&config, org.as_deref(), output).await,
        Commands::Apps { org, space } => commands::apps(&config, &org, &space, output).await,
        Commands::Start(args) => {
            commands::lifecycle(&config, commands::Lifecycle::Start, &args, output).await
        }
        Commands::Stop(args) => {
            commands::lifecycle(&config, commands::Lifecycle::Stop, &args, output).await
        }
        Commands::Delete(args) => {
            commands::lifecycle(&config, commands::Lifecycle::Delete, &args, output).await
        }
        Commands::Push { strategy } => commands::push(config, strategy, &cwd, output).await,
    }
}
