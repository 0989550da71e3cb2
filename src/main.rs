#![forbid(unsafe_code)]

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod error;
mod persistence;
mod status;
mod types;
mod xrandr;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{error, info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{Action, Cli};
use config::StoreConfig;
use persistence::ProfileStore;
use xrandr::{DryRun, Xrandr};

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout is reserved for user-facing status lines
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let Some(action) = cli.action() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let store_config = StoreConfig::resolve(cli.config_dir.clone())
        .context("Failed to resolve the profile directory")?;
    info!(dir = %store_config.dir().display(), ?action, "starting");
    let store = ProfileStore::new(store_config);

    match action {
        Action::Save => {
            app::capture_and_save(&Xrandr::default(), &store, &cli.profile)?;
        }
        Action::Apply => {
            if cli.dry_run {
                let mut sink = DryRun::default();
                app::load_and_apply(&store, &cli.profile, &mut sink);
                info!(commands = sink.invocations.len(), "dry run, no outputs were changed");
            } else {
                app::load_and_apply(&store, &cli.profile, &mut Xrandr::default());
            }
        }
        Action::List => {
            let profiles = store.list().context("Failed to list profiles")?;
            if profiles.is_empty() {
                println!("No saved profiles.");
            } else {
                println!("Saved profiles:");
                for name in profiles {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
