//! Turning duplicate groups into keep/discard decisions.
//!
//! # Overview
//!
//! [`Resolver`] walks a [`Report`] and produces a [`ResolutionPlan`] with one
//! [`Resolution`] per group. Each group goes down one of two branches:
//!
//! - **Oracle**: when interactive mode is on or the strategy is
//!   [`Strategy::KeepManualSelect`], the group is handed to the
//!   [`SelectionAdapter`]. If no decision comes back, an automatic strategy
//!   decides instead; with the manual strategy the group stays unresolved.
//! - **Automatic**: otherwise [`select`] applies the configured strategy.
//!
//! Discarded copies are compared line by line with the kept one. Copies less
//! similar than the configured threshold are flagged for review, since they
//! may hold edits the kept copy lacks.
//!
//! The plan is only a description. Nothing here deletes or moves files.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::oracle::{SelectionAdapter, SelectionOracle};
use crate::scanner::FileRecord;

use super::finder::Report;
use super::selector::{select, Strategy};
use super::similarity::content_similarity;
use super::DuplicateGroup;

/// How a group's kept copy was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMethod {
    /// An automatic strategy decided directly
    Automatic(Strategy),
    /// The selection oracle decided
    Oracle,
    /// The chooser was bypassed (non-interactive); the first member is kept
    FirstMember,
    /// The oracle gave no answer and the strategy decided instead
    Fallback(Strategy),
    /// Nobody decided
    Unresolved,
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic(s) => write!(f, "{s}"),
            Self::Oracle => f.write_str("manual"),
            Self::FirstMember => f.write_str("first"),
            Self::Fallback(s) => write!(f, "fallback:{s}"),
            Self::Unresolved => f.write_str("unresolved"),
        }
    }
}

/// A copy proposed for removal.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardCandidate {
    /// Path of the copy
    pub path: PathBuf,
    /// Line-positional similarity to the kept copy (1.0 when byte-identical)
    pub similarity: f64,
    /// Similarity is below the threshold; check before removing
    pub needs_review: bool,
}

/// Decision for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Normalized key of the group's anchor
    pub anchor_key: String,
    /// Copy to keep, `None` if unresolved
    pub kept: Option<PathBuf>,
    /// Every other member, empty if unresolved
    pub discard: Vec<DiscardCandidate>,
    /// How the decision was made
    pub method: ResolutionMethod,
}

impl Resolution {
    /// Whether a copy to keep was chosen.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.kept.is_some()
    }

    /// Discard candidates flagged for review.
    pub fn diverged(&self) -> impl Iterator<Item = &DiscardCandidate> {
        self.discard.iter().filter(|d| d.needs_review)
    }
}

/// Decisions for a whole report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolutionPlan {
    /// One entry per group, in report order
    pub resolutions: Vec<Resolution>,
    /// The plan was made for a dry run
    pub dry_run: bool,
    /// Similarity threshold used for review flags
    pub similarity_threshold: f64,
}

impl ResolutionPlan {
    /// Number of groups with a kept copy.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_resolved()).count()
    }

    /// Number of groups left undecided.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.resolutions.len() - self.resolved_count()
    }

    /// All paths proposed for removal.
    #[must_use]
    pub fn discard_paths(&self) -> Vec<PathBuf> {
        self.resolutions
            .iter()
            .flat_map(|r| r.discard.iter().map(|d| d.path.clone()))
            .collect()
    }

    /// Number of discard candidates flagged for review.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.resolutions.iter().map(|r| r.diverged().count()).sum()
    }
}

/// Produces keep/discard decisions.
#[derive(Debug)]
pub struct Resolver<O> {
    strategy: Strategy,
    interactive: bool,
    threshold: f64,
    dry_run: bool,
    adapter: SelectionAdapter<O>,
}

impl<O: SelectionOracle> Resolver<O> {
    /// Create a resolver from the resolution settings in `config`.
    ///
    /// The oracle is only consulted when `config.interactive_mode` is set.
    #[must_use]
    pub fn new(config: &Config, oracle: O) -> Self {
        let adapter = SelectionAdapter::new(oracle, config.interactive_mode)
            .with_preview_lines(config.preview_lines);
        Self {
            strategy: config.strategy,
            interactive: config.interactive_mode,
            threshold: config.similarity_threshold,
            dry_run: config.dry_run,
            adapter,
        }
    }

    /// Decide every group in `report`.
    #[must_use]
    pub fn resolve(&self, report: &Report) -> ResolutionPlan {
        let resolutions: Vec<Resolution> = report
            .groups
            .iter()
            .map(|g| self.resolve_group(g))
            .collect();

        let plan = ResolutionPlan {
            resolutions,
            dry_run: self.dry_run,
            similarity_threshold: self.threshold,
        };

        log::info!(
            "Resolution complete: {} resolved, {} unresolved, {} flagged for review{}",
            plan.resolved_count(),
            plan.unresolved_count(),
            plan.review_count(),
            if plan.dry_run { " (dry run)" } else { "" }
        );
        plan
    }

    /// Decide a single group.
    #[must_use]
    pub fn resolve_group(&self, group: &DuplicateGroup) -> Resolution {
        let (kept, method) = if self.interactive || !self.strategy.is_automatic() {
            self.oracle_branch(group)
        } else {
            let kept = select(group, self.strategy).map(|r| r.path().to_path_buf());
            (kept, ResolutionMethod::Automatic(self.strategy))
        };

        log::debug!(
            "Group '{}': keep {} ({})",
            group.anchor_key(),
            kept.as_ref()
                .map_or_else(|| "nothing".to_string(), |p| p.display().to_string()),
            method
        );

        let discard = match &kept {
            Some(path) => self.discard_candidates(group, path),
            None => Vec::new(),
        };

        Resolution {
            anchor_key: group.anchor_key().to_string(),
            kept,
            discard,
            method,
        }
    }

    fn oracle_branch(&self, group: &DuplicateGroup) -> (Option<PathBuf>, ResolutionMethod) {
        if let Some(chosen) = self.adapter.present(group) {
            let method = if self.adapter.is_interactive() && group.has_duplicates() {
                ResolutionMethod::Oracle
            } else {
                ResolutionMethod::FirstMember
            };
            return (Some(chosen), method);
        }

        if self.strategy.is_automatic() {
            let kept = select(group, self.strategy).map(|r| r.path().to_path_buf());
            (kept, ResolutionMethod::Fallback(self.strategy))
        } else {
            (None, ResolutionMethod::Unresolved)
        }
    }

    fn discard_candidates(&self, group: &DuplicateGroup, kept: &Path) -> Vec<DiscardCandidate> {
        let Some(kept_record) = group.members().iter().find(|m| m.path() == kept) else {
            return Vec::new();
        };

        group
            .members()
            .iter()
            .filter(|m| m.path() != kept)
            .map(|m| {
                let similarity = similarity_to(kept_record, m);
                let needs_review = similarity < self.threshold;
                if needs_review {
                    log::warn!(
                        "{} differs from kept copy {} (similarity {:.2})",
                        m.path().display(),
                        kept.display(),
                        similarity
                    );
                }
                DiscardCandidate {
                    path: m.path().to_path_buf(),
                    similarity,
                    needs_review,
                }
            })
            .collect()
    }
}

/// Byte-identical readable copies skip the line comparison.
fn similarity_to(kept: &FileRecord, other: &FileRecord) -> f64 {
    if kept.same_content(other) {
        1.0
    } else {
        content_similarity(kept.path(), other.path())
    }
}
