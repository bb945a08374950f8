//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256 digests
//! of file contents. Files are streamed through the hash function in
//! fixed-size chunks, so memory use does not grow with file size.
//!
//! Unreadable files are not fatal to a scan: [`Hasher::digest_or_sentinel`]
//! substitutes [`SENTINEL_DIGEST`] (all zeros). Two unreadable files therefore
//! compare equal by digest alone; [`crate::scanner::FileRecord::same_content`]
//! never treats a sentinel as a match.
//!
//! # Example
//!
//! ```no_run
//! use notedupe::scanner::{digest_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest(Path::new("Notes.md")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest as _, Sha256};

use super::HashError;

/// A SHA-256 digest (32 bytes).
pub type Digest = [u8; 32];

/// Digest recorded for files whose content could not be read.
pub const SENTINEL_DIGEST: Digest = [0u8; 32];

/// Width of a rendered digest in hex digits.
pub const DIGEST_HEX_LEN: usize = 64;

/// Default read chunk size (8KB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the read chunk size. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Compute the SHA-256 digest of the full file content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn digest(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(hasher.finalize().into())
    }

    /// Compute the digest, substituting [`SENTINEL_DIGEST`] on failure.
    #[must_use]
    pub fn digest_or_sentinel(&self, path: &Path) -> Digest {
        match self.digest(path) {
            Ok(digest) => digest,
            Err(e) => {
                log::warn!("{}; using sentinel digest", e);
                SENTINEL_DIGEST
            }
        }
    }

    /// Check whether two files have the same digest.
    ///
    /// Unreadable files hash to the sentinel, so two unreadable files are
    /// reported identical. Hash collisions are not considered.
    #[must_use]
    pub fn identical(&self, a: &Path, b: &Path) -> bool {
        self.digest_or_sentinel(a) == self.digest_or_sentinel(b)
    }
}

/// Render a digest as lowercase hex, zero-padded to [`DIGEST_HEX_LEN`].
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    digest
        .iter()
        .fold(String::with_capacity(DIGEST_HEX_LEN), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// Parse a 64-digit hex string back into a digest.
#[must_use]
pub fn hex_to_digest(hex: &str) -> Option<Digest> {
    if hex.len() != DIGEST_HEX_LEN || !hex.is_ascii() {
        return None;
    }
    let mut digest = [0u8; 32];
    for (i, byte) in digest.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(digest)
}
