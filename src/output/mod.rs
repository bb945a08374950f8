//! Output formatters for scan reports and resolution plans.
//!
//! This module provides different output formats:
//! - Text for the terminal (colored when enabled)
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use notedupe::duplicates::DuplicateFinder;
//! use notedupe::error::ExitCode;
//! use notedupe::output::JsonOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("vault"))
//!     .unwrap();
//!
//! let output = JsonOutput::new(&report, ExitCode::for_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::{CsvOutput, CsvPlanOutput};
pub use json::{JsonOutput, JsonPlanOutput};
pub use text::{TextOutput, TextPlanOutput};
