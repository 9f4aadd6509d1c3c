//! CLI argument definitions for the formkit binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Value type handled by the convert command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    /// Culture-aware decimal number
    Number,
    /// Culture-aware whole number
    Integer,
    /// Culture-aware date
    Date,
    /// Text, with blank input cleared to null
    ToNull,
}

/// Declarative forms with culture-aware conversion
#[derive(Parser, Debug)]
#[command(name = "formkit")]
#[command(about = "formkit: generate, validate and convert form data")]
#[command(version)]
pub struct Cli {
    /// Culture used for parsing, formatting and messages
    #[arg(short, long, global = true, default_value = "en", env = "FORMKIT_LOCALE")]
    pub locale: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "human", env = "FORMKIT_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a form from a descriptor and print its tree
    Generate(GenerateArgs),
    /// Apply values to a generated form and print localized errors
    Validate(ValidateArgs),
    /// Coerce raw text the way a bound input would, then re-format it
    Convert(ConvertArgs),
}

/// Arguments for the generate command
#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Group descriptor JSON file, or `-` for stdin
    pub descriptor: PathBuf,
}

/// Arguments for the validate command
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Group descriptor JSON file, or `-` for stdin
    pub descriptor: PathBuf,

    /// JSON document with the values to apply
    #[arg(short, long)]
    pub values: Option<PathBuf>,

    /// Require a value for every control instead of patching
    #[arg(long)]
    pub strict: bool,

    /// JSON array of message collections merged over the built-in messages
    #[arg(short, long)]
    pub messages: Option<PathBuf>,

    /// Prefix for field labels, e.g. `person` looks up `person.firstName`
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Arguments for the convert command
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Type to coerce to
    #[arg(short = 't', long = "type", default_value = "number")]
    pub value_type: ValueType,

    /// Raw text as typed into the input
    pub raw: String,

    /// Cap on displayed fraction digits (number)
    #[arg(long)]
    pub max_fraction_digits: Option<u32>,

    /// Percent style (number)
    #[arg(long)]
    pub percent: bool,

    /// Disable group separators (number, integer)
    #[arg(long)]
    pub no_grouping: bool,

    /// Date format: `short`, `datetime`, `iso` or a chrono pattern (date)
    #[arg(long, default_value = "short")]
    pub date_format: String,
}
