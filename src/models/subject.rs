//! Subject model.
//!
//! A subject is one exam to place on a day. Its difficulty weight drives the
//! ordering scenarios and the per-day load used by the balancing objective.

use serde::{Deserialize, Serialize};

/// Lowest accepted difficulty.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest accepted difficulty.
pub const MAX_DIFFICULTY: u8 = 7;

/// An exam subject to be scheduled.
///
/// Identifiers must be unique within one problem instance.
/// Difficulty is expected in `MIN_DIFFICULTY..=MAX_DIFFICULTY`;
/// out-of-range values are reported by validation, not rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier (also its display name).
    pub id: String,
    /// Difficulty weight (1 = easiest, 7 = hardest).
    pub difficulty: u8,
}

impl Subject {
    /// Creates a subject.
    pub fn new(id: impl Into<String>, difficulty: u8) -> Self {
        Self {
            id: id.into(),
            difficulty,
        }
    }

    /// Whether the difficulty lies in the accepted range.
    #[inline]
    pub fn has_valid_difficulty(&self) -> bool {
        (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty)
    }
}
