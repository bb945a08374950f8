//! Line-positional content similarity.
//!
//! This is a cheap sanity check for copies that share a name but may have
//! drifted apart, not a diff algorithm: line `i` of one file is only ever
//! compared with line `i` of the other. An inserted line at the top makes
//! every following line count as different.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Fraction of positions holding the same line in both files.
///
/// Lines are compared without their terminators, so `\n` and `\r\n` endings
/// compare equal. The denominator is the larger of the two line counts.
///
/// * Both files empty: `1.0`
/// * Exactly one file empty: `0.0`
/// * Either file unreadable: `0.0`
#[must_use]
pub fn content_similarity(a: &Path, b: &Path) -> f64 {
    let (lines_a, lines_b) = match (read_lines(a), read_lines(b)) {
        (Ok(la), Ok(lb)) => (la, lb),
        (Err(e), _) | (_, Err(e)) => {
            log::warn!(
                "Cannot compare {} and {}: {}",
                a.display(),
                b.display(),
                e
            );
            return 0.0;
        }
    };

    line_similarity(&lines_a, &lines_b)
}

/// Positional similarity of two already-split line lists.
#[must_use]
pub fn line_similarity<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let same = a.iter().zip(b).filter(|(x, y)| x == y).count();
    let total = a.len().max(b.len());
    same as f64 / total as f64
}

fn read_lines(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let reader = BufReader::new(File::open(path)?);
    reader
        .split(b'\n')
        .map(|line| {
            line.map(|mut l| {
                if l.last() == Some(&b'\r') {
                    l.pop();
                }
                l
            })
        })
        .collect()
}
