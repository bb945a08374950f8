//! notedupe - duplicate note finder
//!
//! Finds copies of the same document in a notes folder by name
//! ("Meeting Notes.md", "meeting notes 2.md"), fingerprints their content with
//! SHA-256, and proposes which copy of each group to keep, either by a fixed
//! strategy or through an interactive chooser. Nothing is ever deleted: the
//! result is a report or a plan for the caller to act on.
//!
//! # Pipeline
//!
//! 1. [`scanner::Catalog`] lists the documents directly inside a directory
//! 2. [`duplicates::assemble`] groups them by normalized name
//! 3. [`duplicates::Resolver`] picks a copy to keep per group

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod output;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat, ResolveArgs, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, Report, Resolver};
use crate::error::ExitCode;
use crate::oracle::FzfOracle;
use crate::output::{
    CsvOutput, CsvPlanOutput, JsonOutput, JsonPlanOutput, TextOutput, TextPlanOutput,
};

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unreadable scan directory,
/// or a failure writing output.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }
    logging::init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match &cli.command {
        Commands::Scan(args) => run_scan(args, config),
        Commands::Resolve(args) => run_resolve(args, config),
        Commands::Config => {
            config.validate().context("Invalid configuration")?;
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
    }
}

fn run_scan(args: &ScanArgs, config: Config) -> Result<ExitCode> {
    let config = args.filters.apply(config);
    let report = scan(&args.path, config)?;
    let exit_code = ExitCode::for_report(&report);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => TextOutput::new(&report).write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(&mut out)?,
        OutputFormat::Csv => CsvOutput::new(&report.groups).write_to(&mut out)?,
    }
    out.flush()?;

    Ok(exit_code)
}

fn run_resolve(args: &ResolveArgs, config: Config) -> Result<ExitCode> {
    let config = args.apply(config);
    let oracle = FzfOracle::new(config.oracle_command.clone());
    let resolver = Resolver::new(&config, oracle);

    let report = scan(&args.path, config)?;
    let exit_code = ExitCode::for_report(&report);
    let plan = resolver.resolve(&report);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => TextPlanOutput::new(&plan).write_to(&mut out)?,
        OutputFormat::Json => JsonPlanOutput::new(&plan, &report, exit_code).write_to(&mut out)?,
        OutputFormat::Csv => CsvPlanOutput::new(&plan).write_to(&mut out)?,
    }
    out.flush()?;

    Ok(exit_code)
}

fn scan(path: &Path, config: Config) -> Result<Report> {
    DuplicateFinder::new(config)
        .find_duplicates(path)
        .with_context(|| format!("Failed to scan {}", path.display()))
}
