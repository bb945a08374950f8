//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::Report;

/// Exit codes for the notedupe binary.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (bad configuration, unreadable directory)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but some files were skipped or unreadable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: The run was aborted.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but some files could not be read.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "ND000",
            Self::GeneralError => "ND001",
            Self::NoDuplicates => "ND002",
            Self::PartialSuccess => "ND003",
        }
    }

    /// Exit code describing a finished scan.
    ///
    /// File-level problems take precedence over the duplicate outcome.
    #[must_use]
    pub fn for_report(report: &Report) -> Self {
        if report.has_file_errors() {
            Self::PartialSuccess
        } else if report.has_duplicates() {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "ND001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Underlying causes, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
        }
    }
}
