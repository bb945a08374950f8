//! JSON output for scan reports and resolution plans.
//!
//! # Report schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "key": "meeting notes",
//!       "total_size": 1000,
//!       "identical": true,
//!       "files": [
//!         {
//!           "path": "vault/Meeting Notes.md",
//!           "size": 500,
//!           "modified": "2024-01-01T10:00:00+00:00",
//!           "modified_secs": 1704103200,
//!           "digest": "2cf24dba..."
//!         }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "skipped_files": 0,
//!     "unreadable_files": 0,
//!     "scan_duration_ms": 4,
//!     "exit_code": 0,
//!     "exit_code_name": "ND000"
//!   }
//! }
//! ```
//!
//! Paths are written as scanned (the scan directory joined with the entry
//! name), not canonicalized.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, Report, Resolution, ResolutionPlan};
use crate::error::ExitCode;
use crate::scanner::FileRecord;

/// A single record in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as scanned
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time (RFC 3339, UTC)
    pub modified: String,
    /// Modification time in seconds since the Unix epoch
    pub modified_secs: i64,
    /// SHA-256 of the content (64 hex digits, all zeros if unreadable)
    pub digest: String,
}

impl JsonFile {
    /// Convert a record.
    #[must_use]
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            path: record.path().to_string_lossy().into_owned(),
            size: record.size(),
            modified: DateTime::<Utc>::from(record.modified()).to_rfc3339(),
            modified_secs: record.modified_secs(),
            digest: record.digest_hex(),
        }
    }
}

/// A duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Normalized key of the anchor
    pub key: String,
    /// Bytes held by all members
    pub total_size: u64,
    /// Every member has the anchor's size and digest
    pub identical: bool,
    /// Members in discovery order
    pub files: Vec<JsonFile>,
}

impl JsonGroup {
    /// Convert a group.
    #[must_use]
    pub fn from_group(group: &DuplicateGroup) -> Self {
        Self {
            key: group.anchor_key().to_string(),
            total_size: group.total_size(),
            identical: group.all_identical(),
            files: group.members().iter().map(JsonFile::from_record).collect(),
        }
    }
}

/// Report summary in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of documents cataloged
    pub total_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Grouped files beyond one per group
    pub duplicate_files: usize,
    /// Files skipped for unreadable metadata
    pub skipped_files: usize,
    /// Files whose content could not be read
    pub unreadable_files: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "ND000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Summarize a report.
    #[must_use]
    pub fn from_report(report: &Report, exit_code: ExitCode) -> Self {
        Self {
            total_files: report.total_files,
            duplicate_groups: report.groups.len(),
            duplicate_files: report.duplicate_files(),
            skipped_files: report.skipped_files,
            unreadable_files: report.unreadable_files,
            scan_duration_ms: u64::try_from(report.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups
    pub groups: Vec<JsonGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON view of a report.
    #[must_use]
    pub fn new(report: &Report, exit_code: ExitCode) -> Self {
        Self {
            groups: report.groups.iter().map(JsonGroup::from_group).collect(),
            summary: JsonSummary::from_report(report, exit_code),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        write_pretty(self, writer)
    }
}

/// A discard candidate in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDiscard {
    /// Path of the copy
    pub path: String,
    /// Line-positional similarity to the kept copy
    pub similarity: f64,
    /// Similarity below the threshold
    pub needs_review: bool,
}

/// A group decision in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonResolution {
    /// Normalized key of the group
    pub key: String,
    /// Kept path, `null` if unresolved
    pub keep: Option<String>,
    /// Copies proposed for removal
    pub discard: Vec<JsonDiscard>,
    /// How the decision was made
    pub method: String,
}

impl JsonResolution {
    /// Convert a resolution.
    #[must_use]
    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self {
            key: resolution.anchor_key.clone(),
            keep: resolution
                .kept
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            discard: resolution
                .discard
                .iter()
                .map(|d| JsonDiscard {
                    path: d.path.to_string_lossy().into_owned(),
                    similarity: d.similarity,
                    needs_review: d.needs_review,
                })
                .collect(),
            method: resolution.method.to_string(),
        }
    }
}

/// Complete JSON resolution plan.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPlanOutput {
    /// The plan is informational only
    pub dry_run: bool,
    /// Threshold used for review flags
    pub similarity_threshold: f64,
    /// One decision per group
    pub resolutions: Vec<JsonResolution>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonPlanOutput {
    /// Build the JSON view of a plan.
    #[must_use]
    pub fn new(plan: &ResolutionPlan, report: &Report, exit_code: ExitCode) -> Self {
        Self {
            dry_run: plan.dry_run,
            similarity_threshold: plan.similarity_threshold,
            resolutions: plan
                .resolutions
                .iter()
                .map(JsonResolution::from_resolution)
                .collect(),
            summary: JsonSummary::from_report(report, exit_code),
        }
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        write_pretty(self, writer)
    }
}

fn write_pretty<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<(), JsonOutputError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
