//! Interactive selection of the copy to keep.
//!
//! # Overview
//!
//! A [`SelectionOracle`] is anything that can be shown a list of candidate
//! lines and answer with one of them: normally a fuzzy finder on the user's
//! terminal ([`FzfOracle`]), a scripted fake in tests.
//!
//! [`SelectionAdapter`] sits between a [`DuplicateGroup`] and the oracle. It
//! renders each member as one line
//!
//! ```text
//! <path>|<mtime secs>|<size bytes>|<preview 1>|<preview 2>|<preview 3>
//! ```
//!
//! and maps the reply back to a path. Every failure of the oracle (missing
//! program, abort, empty reply, a reply naming no member) is logged and
//! reported as "no decision", never as an error.
//!
//! Paths containing `|` cannot be told apart from the field separator; the
//! reply is cut at the first `|`.

mod fzf;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

pub use fzf::{FzfOracle, FZF_ARGS};

use crate::duplicates::DuplicateGroup;
use crate::scanner::FileRecord;

/// Field separator of a candidate line.
pub const FIELD_SEPARATOR: char = '|';

/// Default number of preview lines per candidate.
pub const DEFAULT_PREVIEW_LINES: usize = 3;

/// Errors raised by a selection oracle.
#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    /// The chooser program could not be started.
    #[error("Selection program '{program}' unavailable: {source}")]
    Unavailable {
        /// Program that was run
        program: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// Talking to the chooser failed.
    #[error("Selection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The chooser exited without a selection.
    #[error("Selection aborted (exit status {})", exit_label(.code))]
    Aborted {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Something that picks one line out of a list.
pub trait SelectionOracle {
    /// Present `lines` and return the chosen one.
    ///
    /// `Ok(None)` means the oracle answered with nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the oracle cannot be reached or gives up.
    fn choose(&self, lines: &[String]) -> Result<Option<String>, OracleError>;
}

impl<T: SelectionOracle + ?Sized> SelectionOracle for &T {
    fn choose(&self, lines: &[String]) -> Result<Option<String>, OracleError> {
        (**self).choose(lines)
    }
}

impl<T: SelectionOracle + ?Sized> SelectionOracle for Box<T> {
    fn choose(&self, lines: &[String]) -> Result<Option<String>, OracleError> {
        (**self).choose(lines)
    }
}

/// Bridges duplicate groups and a [`SelectionOracle`].
#[derive(Debug, Clone)]
pub struct SelectionAdapter<O> {
    oracle: O,
    interactive: bool,
    preview_lines: usize,
}

impl<O: SelectionOracle> SelectionAdapter<O> {
    /// Create an adapter. `interactive` false bypasses the oracle entirely.
    #[must_use]
    pub fn new(oracle: O, interactive: bool) -> Self {
        Self {
            oracle,
            interactive,
            preview_lines: DEFAULT_PREVIEW_LINES,
        }
    }

    /// Set how many leading lines of each file are shown.
    #[must_use]
    pub fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }

    /// Whether the oracle will be consulted for multi-member groups.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Ask which member of `group` to keep.
    ///
    /// Returns the first member's path without asking when the adapter is
    /// not interactive or the group has a single member. Returns `None` when
    /// the oracle gives no usable answer.
    #[must_use]
    pub fn present(&self, group: &DuplicateGroup) -> Option<PathBuf> {
        let first = group.members().first()?;
        if !self.interactive || group.len() < 2 {
            return Some(first.path().to_path_buf());
        }

        let lines: Vec<String> = group
            .members()
            .iter()
            .map(|m| self.format_candidate(m))
            .collect();

        let reply = match self.oracle.choose(&lines) {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                log::info!("No selection made for group '{}'", group.anchor_key());
                return None;
            }
            Err(e) => {
                log::warn!("{}; group '{}' left undecided", e, group.anchor_key());
                return None;
            }
        };

        let chosen = parse_selection(&reply)?;
        if group.members().iter().any(|m| m.path() == chosen) {
            log::debug!("Selected {} for group '{}'", chosen.display(), group.anchor_key());
            Some(chosen)
        } else {
            log::warn!(
                "Selection '{}' is not a member of group '{}'",
                chosen.display(),
                group.anchor_key()
            );
            None
        }
    }

    /// Render one candidate line.
    ///
    /// Preview lines are the first lines of the file without terminators.
    /// Unreadable files, or files with fewer lines, contribute fewer fields.
    #[must_use]
    pub fn format_candidate(&self, record: &FileRecord) -> String {
        let mut line = format!(
            "{}{sep}{}{sep}{}",
            record.path().display(),
            record.modified_secs(),
            record.size(),
            sep = FIELD_SEPARATOR
        );
        for preview in preview_lines(record, self.preview_lines) {
            line.push(FIELD_SEPARATOR);
            line.push_str(&preview);
        }
        line
    }
}

/// Extract the path from an oracle reply: everything before the first `|`.
///
/// Returns `None` for an empty reply.
#[must_use]
pub fn parse_selection(reply: &str) -> Option<PathBuf> {
    let reply = reply.trim_end_matches(['\r', '\n']);
    let path = reply
        .split(FIELD_SEPARATOR)
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

fn preview_lines(record: &FileRecord, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }
    let file = match File::open(record.path()) {
        Ok(file) => file,
        Err(e) => {
            log::trace!("No preview for {}: {}", record.path().display(), e);
            return Vec::new();
        }
    };

    BufReader::new(file)
        .split(b'\n')
        .take(count)
        .map_while(Result::ok)
        .map(|raw| {
            let text = String::from_utf8_lossy(&raw);
            text.trim_end_matches('\r').to_string()
        })
        .collect()
}
