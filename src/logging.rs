//! Logging setup for the notedupe binary.
//!
//! The library only talks to the `log` facade; this module installs an
//! `env_logger` backend writing to stderr, so report output on stdout stays
//! clean for piping. The level comes from (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info for this crate, warnings for dependencies
//!
//! Debug builds add a timestamp and the module path; release builds print
//! the level and message only.
//!
//! # Example
//!
//! ```rust,no_run
//! use notedupe::logging::init_logging;
//!
//! // -v on the command line
//! init_logging(1, false);
//! log::debug!("visible");
//! ```

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Install the logger.
///
/// Calling this more than once is harmless: later calls are ignored and
/// return `false`.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - Only show errors (overridden by `RUST_LOG`)
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    let from_env = env::var_os("RUST_LOG").is_some();
    let level = determine_level(verbose, quiet);
    if from_env {
        builder.parse_default_env();
    } else {
        builder
            .filter_level(LevelFilter::Warn.min(level))
            .filter_module(env!("CARGO_CRATE_NAME"), level);
    }

    configure_format(&mut builder, verbose);

    let installed = builder.try_init().is_ok();
    if installed {
        if from_env {
            log::debug!("Logging configured from RUST_LOG");
        } else {
            log::debug!("Logging initialized at level: {:?}", level);
        }
    }
    installed
}

/// Map CLI flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose == 0 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} {}",
                buf.timestamp_seconds(),
                level,
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });
}
