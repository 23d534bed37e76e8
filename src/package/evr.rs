//! RPM EVR (epoch-version-release) comparison.
//!
//! Implements rpm's segment-wise version ordering: numeric segments compare
//! numerically, alphabetic segments lexically, tilde sorts before anything
//! including the empty string, and caret sorts after the end of a string but
//! before any other segment.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed epoch-version-release triple.
///
/// Ordering is epoch first (numeric), then version, then release, each of
/// the latter two compared with [`rpmvercmp`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evr {
    pub epoch: u64,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new(epoch: u64, version: &str, release: &str) -> Self {
        Evr {
            epoch,
            version: version.to_string(),
            release: release.to_string(),
        }
    }

    /// Parse the epoch field as dnf prints it.
    ///
    /// Empty strings and the literal `(none)` mean epoch zero. Anything
    /// non-numeric also falls back to zero rather than failing the record.
    pub fn parse_epoch(raw: &str) -> u64 {
        match raw.trim() {
            "" | "(none)" => 0,
            s => s.parse().unwrap_or(0),
        }
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| rpmvercmp(&self.release, &other.release))
    }
}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:{}-{}", self.epoch, self.version, self.release)
        } else {
            write!(f, "{}-{}", self.version, self.release)
        }
    }
}

fn is_segment_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'~' || b == b'^'
}

/// Compare two rpm version strings segment by segment.
///
/// Mirrors librpm's `rpmvercmp`: separators are any non-alphanumeric bytes
/// other than tilde and caret; a run of digits compares numerically and beats
/// a run of letters; when the segments run out, the longer string is newer.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() || j < b.len() {
        while i < a.len() && !is_segment_byte(a[i]) {
            i += 1;
        }
        while j < b.len() && !is_segment_byte(b[j]) {
            j += 1;
        }

        let ca = a.get(i).copied();
        let cb = b.get(j).copied();

        // Tilde sorts before everything, even the end of the string.
        if ca == Some(b'~') || cb == Some(b'~') {
            if ca != Some(b'~') {
                return Ordering::Greater;
            }
            if cb != Some(b'~') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        // Caret sorts after the end of the string but before any segment.
        if ca == Some(b'^') || cb == Some(b'^') {
            if ca.is_none() {
                return Ordering::Less;
            }
            if cb.is_none() {
                return Ordering::Greater;
            }
            if ca != Some(b'^') {
                return Ordering::Greater;
            }
            if cb != Some(b'^') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        if i >= a.len() || j >= b.len() {
            break;
        }

        let isnum = a[i].is_ascii_digit();
        let sa_start = i;
        let sb_start = j;
        if isnum {
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
        } else {
            while i < a.len() && a[i].is_ascii_alphabetic() {
                i += 1;
            }
            while j < b.len() && b[j].is_ascii_alphabetic() {
                j += 1;
            }
        }

        // Different segment types: the numeric side is newer.
        if sb_start == j {
            return if isnum {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let mut sa = &a[sa_start..i];
        let mut sb = &b[sb_start..j];
        if isnum {
            while sa.len() > 1 && sa[0] == b'0' {
                sa = &sa[1..];
            }
            while sb.len() > 1 && sb[0] == b'0' {
                sb = &sb[1..];
            }
            match sa.len().cmp(&sb.len()) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        match sa.cmp(sb) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    if i >= a.len() && j >= b.len() {
        Ordering::Equal
    } else if i >= a.len() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
