//! p4reg - Perforce-backed package registry
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use p4reg::cli::{Cli, Commands};
use p4reg::config::ConfigManager;
use p4reg::error::{RegistryError, RegistryResult};
use std::error::Error as _;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &RegistryError) {
    eprintln!("{} {}", style("Error:").red().bold(), e);
    if !e.suppresses_trace() {
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  {} {}", style("caused by:").dim(), cause);
            source = cause.source();
        }
    }
    if let Some(hint) = e.hint() {
        eprintln!("{} {}", style("Hint:").yellow(), hint);
    }
    if e.is_retryable() {
        eprintln!("{}", style("(retriable)").dim());
    }
}

async fn run() -> RegistryResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("p4reg=warn"),
        1 => EnvFilter::new("p4reg=info"),
        _ => EnvFilter::new("p4reg=debug"),
    };

    // stdout carries command output, logs go to stderr
    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }

    debug!("Using config {}", manager.path().display());

    match cli.command {
        Commands::Lookup(args) => p4reg::cli::commands::lookup(args, &config).await,
        Commands::Download(args) => p4reg::cli::commands::download(args, &config).await,
        Commands::Manifest(args) => p4reg::cli::commands::manifest(args, &config).await,
        Commands::Configure => p4reg::cli::commands::configure(&manager, &config).await,
        Commands::Config(args) => p4reg::cli::commands::config(args, &manager, &config).await,
        Commands::Cache(args) => p4reg::cli::commands::cache(args, &config).await,
    }
}
