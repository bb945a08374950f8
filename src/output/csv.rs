//! CSV output for scan reports and resolution plans.
//!
//! One row is generated for each grouped file.
//!
//! # Report columns
//!
//! - `group_id`: 1-based group number, in report order
//! - `key`: Normalized key of the group
//! - `path`: Path as scanned
//! - `size`: File size in bytes
//! - `modified`: Last modified time (RFC 3339)
//! - `digest`: SHA-256 of the content (hex)
//!
//! # Plan columns
//!
//! - `group_id`, `key`, `path`
//! - `action`: `keep`, `discard` or `undecided`
//! - `similarity`: similarity to the kept copy (empty for kept or undecided rows)
//! - `needs_review`: `true` when similarity is below the threshold

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::duplicates::{DuplicateGroup, ResolutionPlan};

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    group_id: usize,
    key: &'a str,
    path: String,
    size: u64,
    modified: String,
    digest: String,
}

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    group_id: usize,
    key: &'a str,
    path: String,
    action: &'static str,
    similarity: Option<f64>,
    needs_review: bool,
}

/// CSV view of duplicate groups.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            for record in group.members() {
                csv_writer.serialize(ReportRow {
                    group_id: idx + 1,
                    key: group.anchor_key(),
                    path: record.path().to_string_lossy().into_owned(),
                    size: record.size(),
                    modified: DateTime::<Utc>::from(record.modified()).to_rfc3339(),
                    digest: record.digest_hex(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// CSV view of a resolution plan.
pub struct CsvPlanOutput<'a> {
    plan: &'a ResolutionPlan,
}

impl<'a> CsvPlanOutput<'a> {
    /// Create a new CSV plan formatter.
    #[must_use]
    pub fn new(plan: &'a ResolutionPlan) -> Self {
        Self { plan }
    }

    /// Write the CSV output to the given writer.
    ///
    /// An unresolved group produces a single `undecided` row with an empty
    /// path.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, resolution) in self.plan.resolutions.iter().enumerate() {
            let group_id = idx + 1;
            let key = resolution.anchor_key.as_str();

            match &resolution.kept {
                Some(kept) => csv_writer.serialize(PlanRow {
                    group_id,
                    key,
                    path: kept.to_string_lossy().into_owned(),
                    action: "keep",
                    similarity: None,
                    needs_review: false,
                })?,
                None => csv_writer.serialize(PlanRow {
                    group_id,
                    key,
                    path: String::new(),
                    action: "undecided",
                    similarity: None,
                    needs_review: false,
                })?,
            }

            for discard in &resolution.discard {
                csv_writer.serialize(PlanRow {
                    group_id,
                    key,
                    path: discard.path.to_string_lossy().into_owned(),
                    action: "discard",
                    similarity: Some(discard.similarity),
                    needs_review: discard.needs_review,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
