//! Duplicate detection and resolution.
//!
//! This module provides functionality for:
//! - Grouping documents by normalized name (see [`groups`])
//! - Choosing the copy to keep (see [`selector`])
//! - Orchestrating scan and grouping (see [`finder`])
//! - Building a keep/discard plan (see [`resolve`])
//! - Line-level similarity between copies (see [`similarity`])

pub mod finder;
pub mod groups;
pub mod resolve;
pub mod selector;
pub mod similarity;

pub use finder::{DuplicateFinder, FinderError, Report};
pub use groups::{
    assemble, assemble_with_extension, DuplicateGroup, GroupingStats, MatchKind, NumberedMatch,
};
pub use resolve::{DiscardCandidate, Resolution, ResolutionMethod, ResolutionPlan, Resolver};
pub use selector::{select, Strategy};
pub use similarity::content_similarity;
