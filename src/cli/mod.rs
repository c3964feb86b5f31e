//! CLI definitions.

use crate::config::CliOverrides;
use crate::dialect::Dialect;
use clap::Parser;
use std::path::PathBuf;

/// Conformance harness for decimal arithmetic test vectors
#[derive(Parser, Debug)]
#[command(name = "dectest", author, version, about, long_about = None)]
pub struct Cli {
    /// Test file to run (processed before positional files)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Test files to run, in order
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Test-vector grammar: fixed or variable
    #[arg(long, value_name = "DIALECT")]
    pub dialect: Option<Dialect>,

    /// Precision for parsing literals and intermediate results
    #[arg(long, value_name = "DIGITS")]
    pub internal_precision: Option<u32>,

    /// Config file (default: ./dectest.yaml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no logging except errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Every input source in processing order: `-f` first, then positionals.
    #[must_use]
    pub fn sources(&self) -> Vec<PathBuf> {
        self.file
            .iter()
            .chain(self.files.iter())
            .cloned()
            .collect()
    }

    #[must_use]
    pub const fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dialect: self.dialect,
            internal_precision: self.internal_precision,
        }
    }
}
