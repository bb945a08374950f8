//! Scanner module for document discovery and content hashing.
//!
//! This module provides functionality for:
//! - Single-level directory enumeration with hidden/exclude/extension rules
//! - Filename normalization into comparison keys
//! - SHA-256 content hashing (streaming)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`catalog`]: Directory enumeration and [`FileRecord`] construction
//! - [`normalize`]: Canonical comparison keys and the numbered-duplicate relation
//! - [`hasher`]: SHA-256 file hashing
//!
//! # Example
//!
//! ```no_run
//! use notedupe::config::Config;
//! use notedupe::scanner::Catalog;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let outcome = Catalog::new(Path::new("vault"), &config).scan().unwrap();
//! for record in &outcome.records {
//!     println!("{}: {} bytes", record.path().display(), record.size());
//! }
//! ```

pub mod catalog;
pub mod hasher;
pub mod normalize;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use catalog::{Catalog, CatalogOutcome};
pub use hasher::{digest_to_hex, hex_to_digest, Digest, Hasher, SENTINEL_DIGEST};
pub use normalize::{normalize, numbered_duplicate, DOCUMENT_EXTENSION};

/// One discovered document.
///
/// Every field is set once by the constructor and only exposed through
/// accessors, so a record cannot change after it has been scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    normalized_key: String,
    modified: SystemTime,
    size: u64,
    content_digest: Digest,
    is_tracked: bool,
}

impl FileRecord {
    /// Create a record, deriving the normalized key from the path's file name.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the document
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    /// * `content_digest` - SHA-256 digest of the content
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, content_digest: Digest) -> Self {
        let normalized_key = normalize::normalize(&file_name_lossy(&path));
        Self::with_key(path, normalized_key, size, modified, content_digest)
    }

    /// Create a record with a precomputed normalized key.
    #[must_use]
    pub fn with_key(
        path: PathBuf,
        normalized_key: String,
        size: u64,
        modified: SystemTime,
        content_digest: Digest,
    ) -> Self {
        Self {
            path,
            normalized_key,
            modified,
            size,
            content_digest,
            is_tracked: false,
        }
    }

    /// Path to the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document's file name (lossy UTF-8).
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name_lossy(&self.path)
    }

    /// Grouping key derived from the file name.
    #[must_use]
    pub fn normalized_key(&self) -> &str {
        &self.normalized_key
    }

    /// Last modification time at scan time.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Modification time as whole seconds since the Unix epoch.
    ///
    /// Times before the epoch are reported as negative seconds.
    #[must_use]
    pub fn modified_secs(&self) -> i64 {
        match self.modified.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// File size in bytes at scan time.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// SHA-256 digest of the content, or [`SENTINEL_DIGEST`] if unreadable.
    #[must_use]
    pub fn content_digest(&self) -> &Digest {
        &self.content_digest
    }

    /// Digest as a 64-digit lowercase hex string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.content_digest)
    }

    /// Whether the content could not be read at scan time.
    #[must_use]
    pub fn has_sentinel_digest(&self) -> bool {
        self.content_digest == SENTINEL_DIGEST
    }

    /// Version-control tracking flag. Never populated by this crate.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.is_tracked
    }

    /// Byte identity without a second read: equal size and equal digest.
    ///
    /// A record with the sentinel digest was never read, so it is not known
    /// to match anything, not even another unreadable record.
    #[must_use]
    pub fn same_content(&self, other: &FileRecord) -> bool {
        !self.has_sentinel_digest()
            && self.size == other.size
            && self.content_digest == other.content_digest
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Errors that abort a directory scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The directory could not be opened for listing.
    #[error("Directory unreadable: {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Errors that can occur while reading a single file.
///
/// These are always recovered locally by the scanner.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other failure reading the file.
    #[error("File unreadable: {path}: {source}")]
    FileUnreadable {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::FileUnreadable {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
