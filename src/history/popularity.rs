//! Duplicate-frequency query over past timetables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::HistoryStore;
use crate::error::HistoryError;
use crate::models::{CanonicalForm, Timetable};

/// Number of patterns reported by default.
pub const TOP_K: usize = 3;

/// A distinct timetable pattern and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularTimetable {
    /// First-seen timetable with this pattern.
    pub timetable: Timetable,
    /// Number of occurrences.
    pub count: usize,
}

/// The `k` most frequent distinct timetables.
///
/// Timetables are grouped by canonical form. Results are ordered by
/// descending count, ties by first appearance in `history`.
pub fn popular_timetables<'a, I>(history: I, k: usize) -> Vec<PopularTimetable>
where
    I: IntoIterator<Item = &'a Timetable>,
{
    let mut index: HashMap<CanonicalForm, usize> = HashMap::new();
    let mut patterns: Vec<PopularTimetable> = Vec::new();

    for timetable in history {
        let slot = *index.entry(timetable.canonical_form()).or_insert_with(|| {
            patterns.push(PopularTimetable {
                timetable: timetable.clone(),
                count: 0,
            });
            patterns.len() - 1
        });
        patterns[slot].count += 1;
    }

    // Stable sort keeps first-seen order among equal counts.
    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    patterns.truncate(k);
    patterns
}

/// Loads the store and reports its `k` most frequent timetables.
pub fn popular_from_store<S: HistoryStore + ?Sized>(
    store: &S,
    k: usize,
) -> Result<Vec<PopularTimetable>, HistoryError> {
    let records = store.load()?;
    Ok(popular_timetables(records.iter().map(|r| &r.timetable), k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MemoryStore, RunRecord};
    use crate::models::{ProblemInstance, Subject};

    fn tt(days: &[&[&str]]) -> Timetable {
        Timetable::from_days(days.iter().map(|d| d.iter().copied()))
    }

    #[test]
    fn test_permuted_days_count_once() {
        let history = [tt(&[&["A", "B"], &["C"]]), tt(&[&["B", "A"], &["C"]])];
        let popular = popular_timetables(&history, TOP_K);
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].count, 2);
        // Representative is the first one seen
        assert_eq!(popular[0].timetable, history[0]);
    }

    #[test]
    fn test_ordering_by_count_then_first_seen() {
        let x = tt(&[&["A"], &["B"]]);
        let y = tt(&[&["B"], &["A"]]);
        let z = tt(&[&["A", "B"], &[]]);
        let w = tt(&[&[], &["A", "B"]]);
        let history = [x.clone(), y.clone(), z.clone(), y.clone(), w.clone(), z.clone(), w.clone()];

        let popular = popular_timetables(&history, TOP_K);
        let got: Vec<(Timetable, usize)> =
            popular.into_iter().map(|p| (p.timetable, p.count)).collect();
        // y, z, w tie at 2 → first-seen order; x (1) is cut by k
        assert_eq!(got, vec![(y, 2), (z, 2), (w, 2)]);
    }

    #[test]
    fn test_empty_history() {
        assert!(popular_timetables(std::iter::empty::<&Timetable>(), TOP_K).is_empty());
        assert!(popular_from_store(&MemoryStore::new(), TOP_K).unwrap().is_empty());
    }

    #[test]
    fn test_k_larger_than_patterns() {
        let history = [tt(&[&["A"]]), tt(&[&["A"]])];
        assert_eq!(popular_timetables(&history, 10).len(), 1);
        assert!(popular_timetables(&history, 0).is_empty());
    }

    #[test]
    fn test_from_store() {
        let inst = ProblemInstance::new(2, 2)
            .with_subject(Subject::new("A", 1))
            .with_subject(Subject::new("B", 1))
            .with_subject(Subject::new("C", 1));
        let store = MemoryStore::new();
        for (name, t) in [
            ("u1", tt(&[&["A", "B"], &["C"]])),
            ("u2", tt(&[&["C"], &["A", "B"]])),
            ("u3", tt(&[&["B", "A"], &["C"]])),
        ] {
            store.append(RunRecord::new(name, &inst, t)).unwrap();
        }

        let popular = popular_from_store(&store, TOP_K).unwrap();
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].count, 2);
        assert_eq!(popular[0].timetable.subjects_on(0), ["A", "B"]);
        assert_eq!(popular[1].count, 1);
    }
}
