//! tgac CLI
//!
//! Resolves the Atlantis project metadata of Terragrunt configurations.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::CommandContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} Terragrunt Atlantis metadata", "tgac".green().bold());
        println!();
        println!("Run {} for available commands.", "tgac --help".cyan());
        return Ok(());
    };

    let root = match &command {
        Commands::Scan { root, .. } => root.clone(),
        _ => std::path::PathBuf::from("."),
    };
    let ctx = CommandContext::load(&root, cli.config.as_deref(), cli.working_dir.as_deref())?;

    match command {
        Commands::Locals { path } => commands::run_locals(&ctx, &path),
        Commands::Watch {
            dir,
            max_depth,
            json,
        } => commands::run_watch(&ctx, &dir, max_depth, json),
        Commands::Scan { max_depth, .. } => commands::run_scan(&ctx, max_depth),
    }
}

/// Log to stderr: everything at DEBUG with `--verbose`, else per `RUST_LOG`
/// (default `warn`).
fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| e.to_string())
    };
    result.map_err(|e| CliError::user(format!("Failed to set up logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}
