//! Duplicate group assembly by normalized name.
//!
//! # Overview
//!
//! Records are folded into groups in a single pass over discovery order. A
//! record joins the **first** existing group whose anchor (first member)
//! either has the same normalized key or is a numbered duplicate of it;
//! otherwise it starts a new group. Singleton groups are dropped at the end.
//!
//! First-match makes the result depend on discovery order: when a record
//! could join several groups, the oldest group wins. The catalog visits
//! entries in file-name order, so results are reproducible for a given
//! directory listing.
//!
//! Grouping is name-driven. Two byte-identical files with unrelated names are
//! never merged.
//!
//! # Example
//!
//! ```
//! use notedupe::duplicates::{assemble, NumberedMatch};
//! use notedupe::scanner::{FileRecord, SENTINEL_DIGEST};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let records = vec![
//!     FileRecord::new(PathBuf::from("Notes.md"), 10, SystemTime::now(), SENTINEL_DIGEST),
//!     FileRecord::new(PathBuf::from("Notes 2.md"), 10, SystemTime::now(), SENTINEL_DIGEST),
//!     FileRecord::new(PathBuf::from("Ideas.md"), 10, SystemTime::now(), SENTINEL_DIGEST),
//! ];
//!
//! let (groups, stats) = assemble(records, NumberedMatch::NormalizedKey);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].len(), 2);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::scanner::normalize::numbered_duplicate_with_extension;
use crate::scanner::{FileRecord, DOCUMENT_EXTENSION};

/// Which strings the numbered-duplicate check compares.
///
/// Keys already have their trailing counters stripped, so with
/// `NormalizedKey` the relation only fires on embedded counters
/// (`"plan 2a"` vs `"plan 3b"`). `RawFilename` compares the original names
/// and also catches `"Notes.md"` vs `"Notes 2.md"`; for those pairs key
/// equality already matches in either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NumberedMatch {
    /// Compare the two normalized keys
    #[default]
    #[value(name = "key")]
    #[serde(rename = "key")]
    NormalizedKey,
    /// Compare the two original file names
    #[value(name = "filename")]
    #[serde(rename = "filename")]
    RawFilename,
}

/// Records believed to be copies of the same logical document.
///
/// Members keep discovery order; the first member is the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Start a group anchored on `anchor`.
    #[must_use]
    pub fn new(anchor: FileRecord) -> Self {
        Self {
            members: vec![anchor],
        }
    }

    /// Build a group from records that are already known to belong together.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_members(members: Vec<FileRecord>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self { members })
        }
    }

    /// The first member.
    #[must_use]
    pub fn anchor(&self) -> &FileRecord {
        &self.members[0]
    }

    /// Normalized key of the anchor.
    #[must_use]
    pub fn anchor_key(&self) -> &str {
        self.anchor().normalized_key()
    }

    /// Members in discovery order.
    #[must_use]
    pub fn members(&self) -> &[FileRecord] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for groups built by this module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the group holds copies (2+ members).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }

    /// Total size of all members.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.members.iter().map(FileRecord::size).sum()
    }

    /// Whether every member has the same size and digest as the anchor.
    #[must_use]
    pub fn all_identical(&self) -> bool {
        let anchor = self.anchor();
        self.members.iter().all(|m| m.same_content(anchor))
    }

    /// Paths of all members.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.members.iter().map(|m| m.path().to_path_buf()).collect()
    }

    /// How `record` relates to this group's anchor, if at all.
    ///
    /// `extension` is stripped from raw file names in
    /// [`NumberedMatch::RawFilename`] mode.
    #[must_use]
    pub fn match_kind(
        &self,
        record: &FileRecord,
        mode: NumberedMatch,
        extension: &str,
    ) -> Option<MatchKind> {
        let anchor = self.anchor();
        if anchor.normalized_key() == record.normalized_key() {
            return Some(MatchKind::SameKey);
        }

        let numbered = match mode {
            NumberedMatch::NormalizedKey => {
                numbered_duplicate_with_extension(
                    anchor.normalized_key(),
                    record.normalized_key(),
                    extension,
                )
            }
            NumberedMatch::RawFilename => numbered_duplicate_with_extension(
                &anchor.file_name(),
                &record.file_name(),
                extension,
            ),
        };
        numbered.then_some(MatchKind::Numbered)
    }

    /// Append a member.
    pub fn push(&mut self, record: FileRecord) {
        self.members.push(record);
    }
}

/// Why a record joined a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized keys are equal
    SameKey,
    /// The numbered-duplicate relation holds
    Numbered,
}

/// Statistics from group assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of records processed
    pub total_files: usize,
    /// Groups formed during the pass (including singletons)
    pub groups_formed: usize,
    /// Groups with 2+ members
    pub duplicate_groups: usize,
    /// Records in groups with 2+ members
    pub files_in_groups: usize,
    /// Records left alone in singleton groups
    pub eliminated_unique: usize,
    /// Joins by key equality
    pub key_matches: usize,
    /// Joins by the numbered-duplicate relation
    pub numbered_matches: usize,
}

/// Partition records into duplicate groups.
///
/// # Arguments
///
/// * `records` - Records in discovery order
/// * `mode` - Input to the numbered-duplicate relation
///
/// # Returns
///
/// Groups with 2+ members, in order of creation, plus statistics.
///
/// # Performance
///
/// O(F * G) anchor comparisons for F records and G groups. No file I/O.
#[must_use]
pub fn assemble(
    records: impl IntoIterator<Item = FileRecord>,
    mode: NumberedMatch,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    assemble_with_extension(records, mode, DOCUMENT_EXTENSION)
}

/// Like [`assemble`], for documents with a caller-chosen extension.
#[must_use]
pub fn assemble_with_extension(
    records: impl IntoIterator<Item = FileRecord>,
    mode: NumberedMatch,
    extension: &str,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut stats = GroupingStats::default();

    for record in records {
        stats.total_files += 1;

        let found = groups
            .iter()
            .enumerate()
            .find_map(|(idx, g)| {
                g.match_kind(&record, mode, extension)
                    .map(|kind| (idx, kind))
            });

        match found {
            Some((idx, kind)) => {
                match kind {
                    MatchKind::SameKey => stats.key_matches += 1,
                    MatchKind::Numbered => stats.numbered_matches += 1,
                }
                log::trace!(
                    "{} joins group '{}' ({:?})",
                    record.path().display(),
                    groups[idx].anchor_key(),
                    kind
                );
                groups[idx].push(record);
            }
            None => groups.push(DuplicateGroup::new(record)),
        }
    }

    stats.groups_formed = groups.len();

    let kept: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|g| {
            if g.has_duplicates() {
                stats.duplicate_groups += 1;
                stats.files_in_groups += g.len();
                log::debug!("Group '{}': {} member(s)", g.anchor_key(), g.len());
                true
            } else {
                stats.eliminated_unique += 1;
                false
            }
        })
        .collect();

    log::info!(
        "Grouping complete: {} files -> {} duplicate group(s), {} unique",
        stats.total_files,
        stats.duplicate_groups,
        stats.eliminated_unique
    );

    (kept, stats)
}
