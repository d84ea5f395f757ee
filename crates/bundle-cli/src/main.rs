//! Bundle registry CLI
//!
//! Constructs the registry once per invocation and hands it to the watcher
//! or to the query commands.

mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<ExitCode> {
    match cmd {
        Commands::Watch {
            service,
            catalog,
            retry_delay_ms,
        } => {
            let config = commands::load_config(&service, catalog.as_deref(), retry_delay_ms)?;
            commands::run_watch(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan { service, catalog } => {
            let config = commands::load_config(&service, catalog.as_deref(), None)?;
            commands::run_scan(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve {
            package,
            range,
            service,
        } => {
            let config = commands::load_config(&service, None, None)?;
            let found = commands::run_resolve(&config, &package, range.as_deref())?;
            Ok(if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Imports { archive, service } => {
            let config = commands::load_config(&service, None, None)?;
            commands::run_imports(&config, &archive)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
