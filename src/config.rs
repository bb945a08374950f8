//! Engine configuration.
//!
//! [`Config`] carries the caller's policy for one run: which strategy decides
//! the kept copy, whether to route decisions through the interactive chooser,
//! which files to exclude, and a few tuning knobs. It is built once, validated
//! eagerly with [`Config::validate`], and then only read.
//!
//! # Layering
//!
//! Settings are merged with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config FILE`, or `config.toml` in the platform config dir
//! 3. Environment variables prefixed with `NOTEDUPE_` (e.g. `NOTEDUPE_IO_THREADS=8`)
//! 4. CLI flags, applied by the caller after loading
//!
//! # Example
//!
//! ```toml
//! strategy = "largest"
//! similarity_threshold = 0.9
//! exclude_patterns = ["Templates*", "*.excalidraw.md"]
//! numbered_match = "filename"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::duplicates::{NumberedMatch, Strategy};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "NOTEDUPE_";

/// Default similarity threshold below which a discarded copy is flagged for review.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Errors raised when validating or loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Similarity threshold outside `[0.0, 1.0]` (or not a number).
    #[error("Threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),

    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        message: String,
    },

    /// Thread count of zero.
    #[error("I/O thread count must be at least 1")]
    InvalidThreads,

    /// Empty document extension.
    #[error("Document extension must not be empty")]
    InvalidExtension,

    /// Empty chooser command.
    #[error("Oracle command must not be empty")]
    InvalidOracleCommand,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which member of a group to keep.
    pub strategy: Strategy,
    /// Similarity below which a discarded copy is flagged for review (0.0 to 1.0).
    pub similarity_threshold: f64,
    /// Route decisions through the interactive chooser.
    pub interactive_mode: bool,
    /// Mark the resolution plan as a dry run.
    pub dry_run: bool,
    /// Glob patterns (matched against entry names) excluded at scan time.
    pub exclude_patterns: Vec<String>,
    /// Which strings the numbered-duplicate check compares.
    pub numbered_match: NumberedMatch,
    /// Worker threads for the hashing stage; 1 hashes sequentially.
    pub io_threads: usize,
    /// Document extension without the leading dot.
    pub extension: String,
    /// Program used as the interactive chooser.
    pub oracle_command: String,
    /// Number of leading lines shown per candidate in the chooser.
    pub preview_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::KeepNewest,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            interactive_mode: false,
            dry_run: false,
            exclude_patterns: Vec::new(),
            numbered_match: NumberedMatch::NormalizedKey,
            io_threads: 4,
            extension: crate::scanner::DOCUMENT_EXTENSION.to_string(),
            oracle_command: "fzf".to_string(),
            preview_lines: 3,
        }
    }
}

impl Config {
    /// Load layered configuration using the default config file location.
    ///
    /// Falls back to [`Config::default`] if anything in the chain fails.
    pub fn load() -> Self {
        match Self::figment(Self::config_path().as_deref()).extract() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load layered configuration from an explicit TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::figment(Some(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Parse configuration from a TOML string over the defaults, without
    /// consulting files or the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has mistyped values.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()
            .context("Failed to parse config")
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            log::debug!("Reading config file {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "notedupe", "notedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check every setting before any scanning starts.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold(self.similarity_threshold));
        }
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::InvalidExtension);
        }
        if self.oracle_command.trim().is_empty() {
            return Err(ConfigError::InvalidOracleCommand);
        }
        self.exclude_matcher()?;
        Ok(())
    }

    /// Document extension without a leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Compile the exclude patterns into one glob set.
    ///
    /// Patterns are plain globs matched against the entry name: `#` and `!`
    /// are literal characters, not comment or negation markers.
    /// Returns `None` when there are no patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for a malformed glob.
    pub fn exclude_matcher(&self) -> Result<Option<GlobSet>, ConfigError> {
        if self.exclude_patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }

        let matcher = builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: self.exclude_patterns.join(", "),
            message: e.to_string(),
        })?;
        Ok(Some(matcher))
    }

    /// Set the resolution strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Enable or disable interactive selection.
    #[must_use]
    pub fn with_interactive(mut self, enabled: bool) -> Self {
        self.interactive_mode = enabled;
        self
    }

    /// Enable or disable dry-run marking.
    #[must_use]
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the exclude patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set the numbered-duplicate comparison input.
    #[must_use]
    pub fn with_numbered_match(mut self, mode: NumberedMatch) -> Self {
        self.numbered_match = mode;
        self
    }

    /// Set the hashing thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads;
        self
    }
}
