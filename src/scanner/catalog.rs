//! Catalog scanner: turns a vault directory into [`FileRecord`]s.
//!
//! # Overview
//!
//! The catalog lists the direct children of one directory (no recursion),
//! in file-name order, and keeps only documents:
//!
//! - Names starting with `.` are skipped (hidden files, `.git`, `.obsidian`)
//! - Names matching any exclude glob are skipped
//! - Only regular files ending in `.<extension>` are kept; symbolic links
//!   are resolved, so a link to a note counts as that note
//!
//! Each surviving file is stat'ed and hashed into exactly one record.
//! Hashing runs on a small dedicated rayon pool; records come back in
//! discovery order regardless of which worker finished first.
//!
//! # Failure model
//!
//! Only an unreadable directory aborts the scan. An entry that cannot be
//! listed (a dangling link, say) or whose metadata cannot be read is skipped;
//! a file whose content cannot be read keeps its record with the sentinel
//! digest. Both are counted in [`CatalogOutcome`].

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::GlobSet;
use rayon::prelude::*;
use walkdir::WalkDir;

use super::hasher::Hasher;
use super::normalize::normalize_with_extension;
use super::{FileRecord, HashError, ScanError};
use crate::config::{Config, ConfigError};

/// Result of a catalog scan.
#[derive(Debug, Clone, Default)]
pub struct CatalogOutcome {
    /// One record per eligible document, in discovery order
    pub records: Vec<FileRecord>,
    /// Entries dropped because they could not be listed or stat'ed
    pub skipped_files: usize,
    /// Records whose content could not be read (sentinel digest)
    pub unreadable_files: usize,
}

/// Single-directory document scanner.
#[derive(Debug)]
pub struct Catalog<'a> {
    root: PathBuf,
    config: &'a Config,
    hasher: Hasher,
}

/// Outcome of processing one candidate file.
enum Entry {
    Record(FileRecord, bool),
    Skipped,
}

impl<'a> Catalog<'a> {
    /// Create a catalog for `root` under `config`.
    #[must_use]
    pub fn new(root: &Path, config: &'a Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            hasher: Hasher::new(),
        }
    }

    /// Use a custom hasher (e.g. a different chunk size).
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Scan the directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::DirectoryUnreadable`] if the directory cannot be
    /// listed, or [`ScanError::NotADirectory`] if the path is a file. Exclude
    /// patterns must already be valid (see [`Config::validate`]); a pattern
    /// that fails to compile here is reported as unreadable input.
    pub fn scan(&self) -> Result<CatalogOutcome, ScanError> {
        self.check_root()?;

        let matcher = self
            .config
            .exclude_matcher()
            .map_err(|e| self.pattern_error(e))?;
        let (candidates, unlisted) = self.candidates(matcher.as_ref())?;

        log::debug!(
            "{} candidate document(s) in {}",
            candidates.len(),
            self.root.display()
        );

        let entries = self.process_all(&candidates);

        let mut outcome = CatalogOutcome {
            skipped_files: unlisted,
            ..CatalogOutcome::default()
        };
        for entry in entries {
            match entry {
                Entry::Record(record, unreadable) => {
                    if unreadable {
                        outcome.unreadable_files += 1;
                    }
                    outcome.records.push(record);
                }
                Entry::Skipped => outcome.skipped_files += 1,
            }
        }

        log::info!(
            "Scanned {}: {} document(s), {} skipped, {} unreadable",
            self.root.display(),
            outcome.records.len(),
            outcome.skipped_files,
            outcome.unreadable_files
        );

        Ok(outcome)
    }

    fn check_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if !meta.is_dir() => {
                return Err(ScanError::NotADirectory(self.root.clone()));
            }
            Ok(_) => {}
            Err(e) => return Err(self.unreadable(e)),
        }
        // Opening the listing is the real readability check.
        std::fs::read_dir(&self.root)
            .map(drop)
            .map_err(|e| self.unreadable(e))
    }

    fn unreadable(&self, source: std::io::Error) -> ScanError {
        ScanError::DirectoryUnreadable {
            path: self.root.clone(),
            source,
        }
    }

    fn pattern_error(&self, error: ConfigError) -> ScanError {
        self.unreadable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            error.to_string(),
        ))
    }

    /// List eligible document paths in file-name order, with the number of
    /// entries that could not be listed.
    fn candidates(&self, matcher: Option<&GlobSet>) -> Result<(Vec<PathBuf>, usize), ScanError> {
        let suffix = format!(".{}", self.config.extension());
        let mut paths = Vec::new();
        let mut unlisted = 0;

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                        return Err(self.unreadable(source));
                    }
                    log::warn!("Skipping unreadable entry: {}", e);
                    unlisted += 1;
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();

            if name.starts_with('.') {
                log::trace!("Skipping hidden entry: {}", name);
                continue;
            }

            if matcher.is_some_and(|m| m.is_match(&*name)) {
                log::trace!("Excluded by pattern: {}", name);
                continue;
            }

            if !entry.file_type().is_file() {
                log::trace!("Skipping non-regular entry: {}", name);
                continue;
            }

            if !name.ends_with(&suffix) {
                log::trace!("Skipping non-document: {}", name);
                continue;
            }

            paths.push(entry.into_path());
        }

        Ok((paths, unlisted))
    }

    fn process_all(&self, candidates: &[PathBuf]) -> Vec<Entry> {
        let threads = self.config.io_threads.max(1);
        if threads == 1 || candidates.len() < 2 {
            return candidates.iter().map(|p| self.process(p)).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| candidates.par_iter().map(|p| self.process(p)).collect()),
            Err(e) => {
                log::warn!("Failed to build hashing pool, hashing sequentially: {}", e);
                candidates.iter().map(|p| self.process(p)).collect()
            }
        }
    }

    /// Build the record for one document.
    fn process(&self, path: &Path) -> Entry {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("{}; skipping", HashError::from_io(path, e));
                return Entry::Skipped;
            }
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = normalize_with_extension(&name, self.config.extension());

        let (digest, unreadable) = match self.hasher.digest(path) {
            Ok(d) => (d, false),
            Err(e) => {
                log::warn!("{}; using sentinel digest", e);
                (super::SENTINEL_DIGEST, true)
            }
        };

        log::trace!("Cataloged {} as '{}'", path.display(), key);

        Entry::Record(
            FileRecord::with_key(path.to_path_buf(), key, metadata.len(), modified, digest),
            unreadable,
        )
    }
}
