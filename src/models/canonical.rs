//! Canonical form of a timetable.
//!
//! Two timetables that put the same set of subjects on every day index are
//! the same timetable, whatever order the subjects were listed in. The
//! canonical form sorts each day and keeps days in index order, so equality
//! (and hashing) of canonical forms is exactly that notion of sameness.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timetable;

const DAY_SEPARATOR: &str = " / ";
const SUBJECT_SEPARATOR: char = '|';

/// Order-independent, deterministic key of a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalForm(Vec<Vec<String>>);

impl CanonicalForm {
    /// Computes the canonical form of a timetable.
    pub fn of(timetable: &Timetable) -> Self {
        Self(
            timetable
                .days
                .iter()
                .map(|day| {
                    let mut sorted = day.clone();
                    sorted.sort();
                    sorted
                })
                .collect(),
        )
    }

    /// Sorted subjects per day.
    pub fn days(&self) -> &[Vec<String>] {
        &self.0
    }

    /// String key, e.g. `"A|B / C"`.
    ///
    /// Separator characters inside identifiers are backslash-escaped, so
    /// distinct forms with non-empty identifiers and at least one day never
    /// share a key.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(DAY_SEPARATOR)?;
            }
            for (j, subject) in day.iter().enumerate() {
                if j > 0 {
                    write!(f, "{SUBJECT_SEPARATOR}")?;
                }
                write_escaped(f, subject)?;
            }
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        if matches!(c, '\\' | '/' | SUBJECT_SEPARATOR) {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}
