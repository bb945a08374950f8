//! Command-line interface definitions for notedupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file) apply to every subcommand.
//! Options left unset fall through to the config file, then to the defaults.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups in a notes folder
//! notedupe scan ~/vault
//!
//! # Machine-readable report
//! notedupe scan ~/vault --output json
//!
//! # Propose what to keep, choosing interactively
//! notedupe resolve ~/vault --interactive --dry-run
//!
//! # Show the effective configuration
//! notedupe config
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::duplicates::{NumberedMatch, Strategy};

/// Find and resolve duplicated notes.
///
/// notedupe groups documents whose names differ only by case, punctuation or
/// a copy counter ("Notes.md", "notes 2.md") and proposes which copy to keep.
#[derive(Debug, Parser)]
#[command(name = "notedupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and report duplicate groups
    Scan(ScanArgs),
    /// Scan a directory and propose which copy of each group to keep
    Resolve(ResolveArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Options shared by `scan` and `resolve`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Glob patterns for entry names to skip (can be specified multiple times)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Which names the numbered-copy check compares
    #[arg(long, value_enum, value_name = "MODE")]
    pub numbered_match: Option<NumberedMatch>,

    /// Number of I/O threads for hashing
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan (not recursed into)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for the resolve subcommand.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Directory to scan (not recursed into)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Which copy to keep
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Choose the copy to keep with the interactive chooser
    #[arg(short, long)]
    pub interactive: bool,

    /// Mark the plan as a dry run
    #[arg(long)]
    pub dry_run: bool,

    /// Similarity (0.0 to 1.0) below which a discarded copy is flagged
    #[arg(long, value_name = "RATIO", value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Output format for reports and plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FilterArgs {
    /// Layer these flags over `config`.
    ///
    /// Exclude patterns are appended to the configured ones.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        config
            .exclude_patterns
            .extend(self.exclude_patterns.iter().cloned());
        if let Some(mode) = self.numbered_match {
            config.numbered_match = mode;
        }
        if let Some(threads) = self.io_threads {
            config.io_threads = threads;
        }
        config
    }
}

impl ResolveArgs {
    /// Layer these flags over `config`.
    ///
    /// Boolean switches only ever turn a setting on.
    #[must_use]
    pub fn apply(&self, config: Config) -> Config {
        let mut config = self.filters.apply(config);
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        config.interactive_mode |= self.interactive;
        config.dry_run |= self.dry_run;
        config
    }
}

/// Parse a similarity threshold in `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// use notedupe::cli::parse_threshold;
///
/// assert_eq!(parse_threshold("0.5").unwrap(), 0.5);
/// assert!(parse_threshold("1.5").is_err());
/// ```
///
/// # Errors
///
/// Returns an error string if the value is not a number in range.
pub fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {s}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("Threshold must be between 0.0 and 1.0, got {value}"))
    }
}
