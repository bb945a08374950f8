//! Filename normalization for duplicate matching.
//!
//! # Overview
//!
//! Note-taking apps and file managers create copies by appending a counter
//! to the original name (`Notes.md`, `Notes 2.md`, `Notes 3.md`). This module
//! derives a canonical comparison key so those copies collapse onto the same
//! value, and implements the looser numbered-duplicate relation used by the
//! group assembler.
//!
//! Keys are comparison values only. They are never shown to the user and do
//! not round-trip to a real file name.
//!
//! # Example
//!
//! ```
//! use notedupe::scanner::normalize::{normalize, numbered_duplicate};
//!
//! assert_eq!(normalize("Meeting Notes.md"), "meeting notes");
//! assert_eq!(normalize("Meeting Notes 2.md"), "meeting notes");
//! assert!(numbered_duplicate("Notes.md", "Notes 2.md"));
//! assert!(!numbered_duplicate("Notes.md", "Other.md"));
//! ```

use unicode_normalization::UnicodeNormalization;

/// Extension of the documents this tool targets, without the leading dot.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Compute the normalized comparison key for a file name.
///
/// 1. Strips a trailing `.md` extension.
/// 2. Lowercases and keeps only alphanumerics, spaces, `-` and `_`.
/// 3. Strips trailing spaces and ASCII digits.
///
/// The function is total: any input yields a (possibly empty) key.
#[must_use]
pub fn normalize(filename: &str) -> String {
    normalize_with_extension(filename, DOCUMENT_EXTENSION)
}

/// Like [`normalize`], for a caller-chosen document extension.
#[must_use]
pub fn normalize_with_extension(filename: &str, extension: &str) -> String {
    let mut key = comparison_form(filename, extension);
    let trimmed_len = key
        .trim_end_matches(|c: char| c == ' ' || c.is_ascii_digit())
        .len();
    key.truncate(trimmed_len);
    key
}

/// Steps 1 and 2 of normalization: extension stripped, characters filtered,
/// trailing counters kept.
///
/// Names are composed to NFC first so a name stored decomposed (as macOS
/// does) yields the same key as its precomposed spelling.
#[must_use]
pub fn comparison_form(filename: &str, extension: &str) -> String {
    let stem = strip_extension(filename, extension);
    stem.nfc()
        .flat_map(char::to_lowercase)
        .filter(|&c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
        .collect()
}

/// Remove `.<extension>` from the end of `name` if present.
#[must_use]
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(name)
}

/// Check whether two names are numbered copies of each other.
///
/// Each name has its extension stripped and is reduced to its
/// [`comparison_form`], then split on the last space into `(base, suffix)`.
/// A name without a space is its own base with an empty suffix. The relation
/// holds when the bases are equal and at least one suffix starts with an
/// ASCII digit, which matches `"Notes"` against `"Notes 2"`.
#[must_use]
pub fn numbered_duplicate(name1: &str, name2: &str) -> bool {
    numbered_duplicate_with_extension(name1, name2, DOCUMENT_EXTENSION)
}

/// Like [`numbered_duplicate`], for a caller-chosen document extension.
#[must_use]
pub fn numbered_duplicate_with_extension(name1: &str, name2: &str, extension: &str) -> bool {
    let form1 = comparison_form(name1, extension);
    let form2 = comparison_form(name2, extension);

    let (base1, suffix1) = split_counter(&form1);
    let (base2, suffix2) = split_counter(&form2);

    base1 == base2 && (starts_with_digit(suffix1) || starts_with_digit(suffix2))
}

fn split_counter(form: &str) -> (&str, &str) {
    match form.rfind(' ') {
        Some(idx) => (&form[..idx], &form[idx + 1..]),
        None => (form, ""),
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}
