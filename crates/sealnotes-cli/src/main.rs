//! Sealnotes CLI - notes with optional per-note encryption at rest
//!
//! This is the command-line interface for Sealnotes. It owns configuration,
//! logging and exit codes, and delegates note handling to `sealnotes-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::{Cli, Commands};
use crate::config::{load_config, SealnotesConfig};
use crate::constants::DEFAULT_LOG_FILTER;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        let code = errors::report(&err);
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return commands::handle_completions(*shell);
    }

    let config = load_config(&resolve_config_path()?)?;
    init_tracing(&config);

    let ctx = AppContext::new(cli, config);
    match &cli.command {
        Commands::Create(args) => commands::handle_create(&ctx, args),
        Commands::Show(args) => commands::handle_show(&ctx, args),
        Commands::List(args) => commands::handle_list(&ctx, args),
        Commands::Update(args) => commands::handle_update(&ctx, args),
        Commands::Delete(args) => commands::handle_delete(&ctx, args),
        Commands::Recreate(args) => commands::handle_recreate(&ctx, args),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Log to stderr, filtered by `RUST_LOG`, else `[log] filter`, else `warn`.
fn init_tracing(config: &SealnotesConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
