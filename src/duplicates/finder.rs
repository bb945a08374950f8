//! Duplicate finder: the scan-and-group pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the detection pipeline for one directory:
//! 1. **Validate** - Reject a bad [`Config`] before touching the disk
//! 2. **Catalog** - List and hash eligible documents (see [`crate::scanner::Catalog`])
//! 3. **Assemble** - Group records by normalized name (see [`crate::duplicates::groups`])
//!
//! The result is a [`Report`]. Deciding what to keep is a separate step, see
//! [`crate::duplicates::Resolver`].
//!
//! # Example
//!
//! ```no_run
//! use notedupe::config::Config;
//! use notedupe::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(Config::default());
//! let report = finder.find_duplicates(Path::new("vault")).unwrap();
//!
//! println!("Scanned {} files", report.total_files);
//! println!("Found {} duplicate groups", report.groups.len());
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{Config, ConfigError};
use crate::scanner::{Catalog, ScanError};

use super::groups::{assemble_with_extension, DuplicateGroup, GroupingStats};

/// Outcome of one scan.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Number of documents cataloged
    pub total_files: usize,
    /// Groups with two or more members, in order of creation
    pub groups: Vec<DuplicateGroup>,
    /// Statistics from group assembly
    pub stats: GroupingStats,
    /// Files skipped because their metadata could not be read
    pub skipped_files: usize,
    /// Records carrying the sentinel digest
    pub unreadable_files: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl Report {
    /// Whether any duplicate group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Whether any file-level problem was recovered during the scan.
    #[must_use]
    pub fn has_file_errors(&self) -> bool {
        self.skipped_files > 0 || self.unreadable_files > 0
    }

    /// Number of grouped files beyond one per group.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(|g| g.len() - 1).sum()
    }

    /// Bytes held by all grouped copies.
    #[must_use]
    pub fn grouped_size(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::total_size).sum()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The directory could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Runs the detection pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct DuplicateFinder {
    config: Config,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the finder
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find duplicate documents directly inside `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory to scan (not recursed into)
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The configuration is invalid
    /// - The path is not a directory or cannot be listed
    ///
    /// Unreadable individual files never fail the scan.
    pub fn find_duplicates(&self, path: &Path) -> Result<Report, FinderError> {
        let start_time = Instant::now();
        self.config.validate()?;

        log::info!("Starting duplicate scan of {}", path.display());

        let outcome = Catalog::new(path, &self.config).scan()?;
        let total_files = outcome.records.len();

        let (groups, stats) = assemble_with_extension(
            outcome.records,
            self.config.numbered_match,
            self.config.extension(),
        );

        let report = Report {
            total_files,
            groups,
            stats,
            skipped_files: outcome.skipped_files,
            unreadable_files: outcome.unreadable_files,
            scan_duration: start_time.elapsed(),
        };

        log::info!(
            "Scan complete: {} files, {} duplicate group(s) in {:.2?}",
            report.total_files,
            report.groups.len(),
            report.scan_duration
        );
        if report.has_file_errors() {
            log::warn!(
                "{} file(s) skipped, {} file(s) unreadable",
                report.skipped_files,
                report.unreadable_files
            );
        }

        Ok(report)
    }
}
