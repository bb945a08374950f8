//! Human-readable output for the terminal.
//!
//! Colors come from `yansi` and follow its global switch, so callers turn
//! them off once (`--no-color`, `NO_COLOR`) and every writer here respects it.
//! Sizes are rendered with `bytesize`; times in the local timezone.

use std::io::{self, Write};
use std::time::SystemTime;

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use yansi::Paint;

use crate::duplicates::{Report, ResolutionPlan};

/// Text view of a scan report.
pub struct TextOutput<'a> {
    report: &'a Report,
}

impl<'a> TextOutput<'a> {
    /// Create a text formatter for `report`.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Write every group followed by a summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (idx, group) in self.report.groups.iter().enumerate() {
            let note = if group.all_identical() {
                "identical"
            } else {
                "content differs"
            };
            writeln!(
                writer,
                "{} {} ({} files, {}, {})",
                format!("Group {}:", idx + 1).bold(),
                group.anchor_key().cyan(),
                group.len(),
                format_size(group.total_size()),
                note.dim()
            )?;
            for record in group.members() {
                writeln!(
                    writer,
                    "  {}  {:>10}  {}",
                    record.path().display(),
                    format_size(record.size()),
                    format_time(record.modified()).dim()
                )?;
            }
            writeln!(writer)?;
        }

        write_summary(writer, self.report)
    }
}

/// Text view of a resolution plan.
pub struct TextPlanOutput<'a> {
    plan: &'a ResolutionPlan,
}

impl<'a> TextPlanOutput<'a> {
    /// Create a text formatter for `plan`.
    #[must_use]
    pub fn new(plan: &'a ResolutionPlan) -> Self {
        Self { plan }
    }

    /// Write one block per group and a closing summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (idx, resolution) in self.plan.resolutions.iter().enumerate() {
            writeln!(
                writer,
                "{} {} [{}]",
                format!("Group {}:", idx + 1).bold(),
                resolution.anchor_key.cyan(),
                resolution.method
            )?;

            match &resolution.kept {
                Some(kept) => writeln!(writer, "  {}  {}", "keep   ".green(), kept.display())?,
                None => writeln!(writer, "  {}", "undecided".yellow())?,
            }
            for discard in &resolution.discard {
                let line = format!(
                    "  discard  {} (similarity {:.2})",
                    discard.path.display(),
                    discard.similarity
                );
                if discard.needs_review {
                    writeln!(writer, "{} {}", line.red(), "review".red().bold())?;
                } else {
                    writeln!(writer, "{line}")?;
                }
            }
            writeln!(writer)?;
        }

        writeln!(
            writer,
            "{} resolved, {} unresolved, {} flagged for review (threshold {:.2}){}",
            self.plan.resolved_count(),
            self.plan.unresolved_count(),
            self.plan.review_count(),
            self.plan.similarity_threshold,
            if self.plan.dry_run { ", dry run" } else { "" }
        )
    }
}

fn write_summary<W: Write>(writer: &mut W, report: &Report) -> io::Result<()> {
    if report.has_duplicates() {
        writeln!(
            writer,
            "Scanned {} files: {} duplicate group(s), {} extra copies ({})",
            report.total_files,
            report.groups.len(),
            report.duplicate_files(),
            format_size(report.grouped_size())
        )?;
    } else {
        writeln!(
            writer,
            "Scanned {} files: {}",
            report.total_files,
            "no duplicates found".green()
        )?;
    }
    if report.has_file_errors() {
        writeln!(
            writer,
            "{}",
            format!(
                "{} skipped, {} unreadable",
                report.skipped_files, report.unreadable_files
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// Format a byte count for display.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Format a timestamp in the local timezone, minute precision.
#[must_use]
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string()
}
