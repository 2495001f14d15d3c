//! Assignment and timetable (solution) models.
//!
//! An `Assignment` is the solver's decision state: one day index per subject,
//! in input order. A `Timetable` is its day-partitioned view, the shape
//! callers render and persist.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CanonicalForm, Subject};

/// A total subject → day mapping.
///
/// `days[i]` is the day of the i-th subject of the instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    days: Vec<usize>,
}

impl Assignment {
    /// Wraps a complete day vector.
    pub fn new(days: Vec<usize>) -> Self {
        Self { days }
    }

    /// Day of the given subject (`None` past the last subject).
    #[inline]
    pub fn day_of(&self, subject: usize) -> Option<usize> {
        self.days.get(subject).copied()
    }

    /// Whether `subject` sits on `day`.
    #[inline]
    pub fn is_on_day(&self, subject: usize, day: usize) -> bool {
        self.days.get(subject) == Some(&day)
    }

    /// Day indices in subject order.
    pub fn days(&self) -> &[usize] {
        &self.days
    }

    /// Number of assigned subjects.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no subject is assigned.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of subjects on each day of a `num_days` window.
    ///
    /// Out-of-range days are ignored.
    pub fn day_counts(&self, num_days: usize) -> Vec<usize> {
        let mut counts = vec![0; num_days];
        for &d in &self.days {
            if let Some(c) = counts.get_mut(d) {
                *c += 1;
            }
        }
        counts
    }

    /// Difficulty load of each day of a `num_days` window.
    pub fn day_loads(&self, subjects: &[Subject], num_days: usize) -> Vec<u32> {
        let mut loads = vec![0u32; num_days];
        for (subject, &d) in subjects.iter().zip(&self.days) {
            if let Some(l) = loads.get_mut(d) {
                *l += u32::from(subject.difficulty);
            }
        }
        loads
    }

    /// Groups subjects by day, keeping input order within each day.
    pub fn to_timetable(&self, subjects: &[Subject], num_days: usize) -> Timetable {
        let mut days = vec![Vec::new(); num_days];
        for (subject, &d) in subjects.iter().zip(&self.days) {
            if let Some(day) = days.get_mut(d) {
                day.push(subject.id.clone());
            }
        }
        Timetable { days }
    }
}

/// Day-partitioned result: `days[d]` holds the subject IDs on day `d`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetable {
    /// Subject IDs per day, one entry per day of the window.
    pub days: Vec<Vec<String>>,
}

impl Timetable {
    /// Creates a timetable with `num_days` empty days.
    pub fn empty(num_days: usize) -> Self {
        Self {
            days: vec![Vec::new(); num_days],
        }
    }

    /// Builds a timetable from per-day subject lists.
    pub fn from_days<I, D, S>(days: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            days: days
                .into_iter()
                .map(|d| d.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of scheduled subjects.
    pub fn subject_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// Subjects on a day (empty for out-of-range days).
    pub fn subjects_on(&self, day: usize) -> &[String] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Day the subject sits on.
    pub fn day_of(&self, subject_id: &str) -> Option<usize> {
        self.days
            .iter()
            .position(|d| d.iter().any(|s| s == subject_id))
    }

    /// Difficulty load per day. Unknown subjects weigh 0.
    pub fn day_loads(&self, difficulties: &BTreeMap<String, u8>) -> Vec<u32> {
        self.days
            .iter()
            .map(|d| {
                d.iter()
                    .map(|s| difficulties.get(s).copied().map(u32::from).unwrap_or(0))
                    .sum()
            })
            .collect()
    }

    /// Order-independent key used for duplicate detection.
    pub fn canonical_form(&self) -> CanonicalForm {
        CanonicalForm::of(self)
    }
}

/// A hard-constraint violation found when checking an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related subject ID, or the day index for day-level violations.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// More subjects on a day than the capacity allows.
    CapacityExceeded,
    /// Subject placed on an excluded weekend day.
    ForbiddenDay,
    /// Scenario ordering between two subjects broken.
    OrderingViolation,
    /// Subject has no day.
    Unassigned,
    /// Subject placed outside the day window.
    DayOutOfRange,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("Math", 7),
            Subject::new("English", 2),
            Subject::new("Physics", 5),
        ]
    }

    #[test]
    fn test_assignment_predicates() {
        let a = Assignment::new(vec![0, 1, 0]);
        assert!(a.is_on_day(0, 0));
        assert!(!a.is_on_day(1, 0));
        assert!(!a.is_on_day(9, 0));
        assert_eq!(a.day_of(1), Some(1));
        assert_eq!(a.day_of(3), None);
        assert_eq!(a.day_counts(3), vec![2, 1, 0]);
    }

    #[test]
    fn test_assignment_loads() {
        let a = Assignment::new(vec![0, 1, 0]);
        assert_eq!(a.day_loads(&subjects(), 3), vec![12, 2, 0]);
    }

    #[test]
    fn test_to_timetable_keeps_input_order() {
        let a = Assignment::new(vec![1, 1, 1]);
        let tt = a.to_timetable(&subjects(), 2);
        assert_eq!(tt.day_count(), 2);
        assert!(tt.subjects_on(0).is_empty());
        assert_eq!(tt.subjects_on(1), ["Math", "English", "Physics"]);
        assert_eq!(tt.subject_count(), 3);
    }

    #[test]
    fn test_timetable_queries() {
        let tt = Timetable::from_days([vec!["A", "B"], vec!["C"]]);
        assert_eq!(tt.day_of("C"), Some(1));
        assert_eq!(tt.day_of("Z"), None);
        assert!(tt.subjects_on(5).is_empty());

        let diffs: BTreeMap<String, u8> =
            [("A".to_string(), 3), ("B".to_string(), 4), ("C".to_string(), 1)].into();
        assert_eq!(tt.day_loads(&diffs), vec![7, 1]);
    }

    #[test]
    fn test_timetable_serializes_as_nested_lists() {
        let tt = Timetable::from_days([vec!["A"], vec![]]);
        let json = serde_json::to_string(&tt).unwrap();
        assert_eq!(json, r#"[["A"],[]]"#);
    }
}
