//! `bookshelf` binary: command-line boundary over the catalog core.

mod cli;
mod commands;

use anyhow::Result;
use bookshelf_core::{default_log_level, init_logging, CatalogError};
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = start_logging(&cli) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    let config = cli.service_config();
    match commands::execute(cli.command, &cli.db, config) {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<CatalogError>() {
            Some(catalog_err) => {
                let kind = catalog_err.kind();
                eprintln!("{kind} ({}): {catalog_err}", kind.status_code());
                ExitCode::from(2)
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn start_logging(cli: &Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }
    Ok(())
}
