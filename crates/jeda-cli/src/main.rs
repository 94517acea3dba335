//! Jeda CLI - timer settings and focus stats from the terminal
//!
//! Edits are committed to the local settings file first and mirrored to the
//! signed-in account in the background.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::settings_cmd::{run_settings, run_settings_show};
use crate::commands::stats::run_stats;
use crate::error::CliError;

const DEFAULT_LOG_DIRECTIVE: &str = "jeda=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let global_profile = cli.profile.as_deref();
    let settings_path = cli.settings_path.clone();
    let context_for =
        |profile: Option<&str>| CliContext::resolve(profile, settings_path.clone());

    match cli.command {
        Some(Commands::Settings { command }) => {
            run_settings(command, &context_for(global_profile)?).await
        }
        Some(Commands::Stats { command }) => run_stats(command, &context_for(global_profile)?).await,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())
        }
        Some(Commands::Config { command }) => run_config(command, global_profile),
        Some(Commands::Auth { command }) => run_auth(command, global_profile, context_for).await,
        None => run_settings_show(false, &context_for(global_profile)?),
    }
}
