//! Keep-candidate selection strategies.
//!
//! A [`Strategy`] picks which member of a [`DuplicateGroup`] should survive.
//! Selection is pure: it reads the recorded metadata and never touches the
//! filesystem. Ties always go to the member discovered first.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::DuplicateGroup;
use crate::scanner::FileRecord;

/// Policy for choosing the member to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Strategy {
    /// Keep the most recently modified copy
    #[default]
    #[value(name = "newest")]
    #[serde(rename = "newest")]
    KeepNewest,
    /// Keep the largest copy
    #[value(name = "largest")]
    #[serde(rename = "largest")]
    KeepLargest,
    /// Keep the copy with the most recent commit (falls back to modification time)
    #[value(name = "most-recent-commit")]
    #[serde(rename = "most-recent-commit")]
    KeepMostRecentCommit,
    /// Ask the interactive chooser
    #[value(name = "manual")]
    #[serde(rename = "manual")]
    KeepManualSelect,
}

impl Strategy {
    /// Whether the strategy can decide without a human.
    #[must_use]
    pub fn is_automatic(self) -> bool {
        !matches!(self, Self::KeepManualSelect)
    }

    /// Name used on the command line and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepNewest => "newest",
            Self::KeepLargest => "largest",
            Self::KeepMostRecentCommit => "most-recent-commit",
            Self::KeepManualSelect => "manual",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choose the member of `group` to keep.
///
/// Returns `None` for [`Strategy::KeepManualSelect`] on groups with more than
/// one member (the decision belongs to the selection oracle) and for empty
/// groups. A single-member group yields that member for every strategy.
///
/// # Example
///
/// ```
/// use notedupe::duplicates::{select, DuplicateGroup, Strategy};
/// use notedupe::scanner::{FileRecord, SENTINEL_DIGEST};
/// use std::path::PathBuf;
/// use std::time::{Duration, SystemTime};
///
/// let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
/// let group = DuplicateGroup::from_members(vec![
///     FileRecord::new(PathBuf::from("a.md"), 10, t, SENTINEL_DIGEST),
///     FileRecord::new(PathBuf::from("a 2.md"), 10, t + Duration::from_secs(60), SENTINEL_DIGEST),
/// ])
/// .unwrap();
///
/// let kept = select(&group, Strategy::KeepNewest).unwrap();
/// assert_eq!(kept.file_name(), "a 2.md");
/// ```
#[must_use]
pub fn select(group: &DuplicateGroup, strategy: Strategy) -> Option<&FileRecord> {
    let members = group.members();
    match members {
        [] => None,
        [only] => Some(only),
        _ => match strategy {
            Strategy::KeepNewest => first_max_by(members, FileRecord::modified),
            Strategy::KeepLargest => first_max_by(members, FileRecord::size),
            Strategy::KeepMostRecentCommit => {
                log::debug!(
                    "No commit history for group '{}', using modification time",
                    group.anchor_key()
                );
                first_max_by(members, FileRecord::modified)
            }
            Strategy::KeepManualSelect => None,
        },
    }
}

/// Maximum by `key`, keeping the earliest member on ties.
fn first_max_by<K, F>(members: &[FileRecord], key: F) -> Option<&FileRecord>
where
    K: PartialOrd,
    F: Fn(&FileRecord) -> K,
{
    let mut iter = members.iter();
    let mut best = iter.next()?;
    let mut best_key = key(best);
    for candidate in iter {
        let k = key(candidate);
        if k > best_key {
            best = candidate;
            best_key = k;
        }
    }
    Some(best)
}
