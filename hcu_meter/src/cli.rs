//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hcu_meter::ArgValue;

#[derive(Parser, Debug)]
pub(crate) struct Args {
    /// Transaction trace file. If not specified, reads from stdin.
    #[arg(short, long)]
    pub trace: Option<PathBuf>,

    /// Path to the operator price table (JSON).
    #[arg(short, long)]
    pub prices: PathBuf,

    /// Path to the FHE type registry (JSON). Defaults to the built-in types.
    #[arg(long)]
    pub types: Option<PathBuf>,

    /// Only account events emitted by this executor contract address.
    #[arg(short, long)]
    pub executor: Option<ArgValue>,

    /// Report encoding.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file. If not specified, writes to stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Versioned msgpack report.
    Binary,
}
