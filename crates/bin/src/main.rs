//! `formkit` command line: generate forms from descriptors, validate
//! values against them and try out culture-aware conversion.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use formkit::locale::Globalization;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("formkit=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Unknown cultures are rejected up front instead of silently falling back.
    let culture = Globalization::default().strict_culture(&cli.locale)?.name.clone();
    tracing::debug!(%culture, command = ?cli.command, "Starting");

    match &cli.command {
        Commands::Generate(args) => commands::generate::run(args, cli.format)?,
        Commands::Validate(args) => return commands::validate::run(args, &culture, cli.format),
        Commands::Convert(args) => commands::convert::run(args, &culture, cli.format)?,
    }
    Ok(ExitCode::SUCCESS)
}
