mod commands;
mod error;
mod progress;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, record, sync, Context};
use crate::error::{exit_code_for, invalid_input, report_error};
use orderlink_config as config;

/// Read when `RUST_LOG` is unset, e.g. `LOG_LEVEL=info`.
const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Parser)]
#[command(
    name = "orderlink",
    version,
    about = "Link NocoDB orders to clients by email"
)]
pub(crate) struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Link every client to the orders sharing its email
    Sync(sync::SyncArgs),
    /// Fetch a single record and print it as JSON
    Record(record::RecordArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let env_loaded = load_env_file(cli.env_file.clone());
    init_logging(verbose);
    let result = env_loaded.and_then(|()| run(cli));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
        ..
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) if path.exists() => {
                        debug!(path = %path.display(), "config resolved");
                    }
                    Ok(path) => {
                        debug!(path = %path.display(), "config missing, using environment");
                    }
                    Err(err) => debug!(error = %err, "config unavailable"),
                }
                debug!(remote = ?app_config.remote, "remote configured");
            }

            let ctx = Context {
                config: &app_config,
                json,
            };

            match command {
                Command::Sync(args) => sync::sync_all(&ctx, args),
                Command::Record(args) => record::show_record(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

/// An explicit `--env-file` must exist; the default `./.env` is optional.
fn load_env_file(path: Option<PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(invalid_input(format!(
                    "env file not found: {}",
                    path.display()
                )));
            }
            dotenvy::from_path(&path)
                .with_context(|| format!("load env file {}", path.display()))?;
        }
        None => match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err).with_context(|| "load .env"),
        },
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose {
        "debug".to_string()
    } else {
        env::var(LOG_LEVEL_ENV)
            .ok()
            .map(|level| level.trim().to_ascii_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| "warn".to_string())
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
