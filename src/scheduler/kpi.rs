//! Timetable quality metrics (KPIs).
//!
//! Computes per-day difficulty statistics from a timetable and the
//! instance it was built for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Day loads | Sum of difficulties per day |
//! | Max / Min load | Heaviest and lightest day (empty days count as 0) |
//! | Load spread | Max load − min load (the balancing objective) |
//! | Used days | Days with at least one subject |
//! | Peak subjects | Most subjects on a single day |
//! | Avg load | Mean load over all days |

use crate::models::{ProblemInstance, Timetable};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableKpi {
    /// Difficulty load per day.
    pub day_loads: Vec<u32>,
    /// Heaviest day load.
    pub max_load: u32,
    /// Lightest day load.
    pub min_load: u32,
    /// `max_load - min_load`.
    pub load_spread: u32,
    /// Days holding at least one subject.
    pub used_days: usize,
    /// Largest number of subjects on one day.
    pub peak_subjects: usize,
    /// Mean load over all days.
    pub avg_load: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable and its instance.
    ///
    /// Subjects missing from the instance weigh 0.
    pub fn calculate(timetable: &Timetable, instance: &ProblemInstance) -> Self {
        let day_loads = timetable.day_loads(&instance.difficulty_map());
        let max_load = day_loads.iter().copied().max().unwrap_or(0);
        let min_load = day_loads.iter().copied().min().unwrap_or(0);

        let avg_load = if day_loads.is_empty() {
            0.0
        } else {
            f64::from(day_loads.iter().sum::<u32>()) / day_loads.len() as f64
        };

        Self {
            used_days: timetable.days.iter().filter(|d| !d.is_empty()).count(),
            peak_subjects: timetable.days.iter().map(Vec::len).max().unwrap_or(0),
            load_spread: max_load - min_load,
            max_load,
            min_load,
            avg_load,
            day_loads,
        }
    }

    /// Whether the timetable keeps every day within the given load spread.
    pub fn meets_spread(&self, max_spread: u32) -> bool {
        self.load_spread <= max_spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(3, 2)
            .with_subject(Subject::new("Math", 7))
            .with_subject(Subject::new("English", 3))
            .with_subject(Subject::new("Art", 1))
    }

    #[test]
    fn test_kpi_basic() {
        let tt = Timetable::from_days([vec!["Math"], vec!["English", "Art"], vec![]]);
        let kpi = TimetableKpi::calculate(&tt, &instance());
        assert_eq!(kpi.day_loads, vec![7, 4, 0]);
        assert_eq!(kpi.max_load, 7);
        assert_eq!(kpi.min_load, 0);
        assert_eq!(kpi.load_spread, 7);
        assert_eq!(kpi.used_days, 2);
        assert_eq!(kpi.peak_subjects, 2);
        assert!((kpi.avg_load - 11.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = TimetableKpi::calculate(&Timetable::default(), &instance());
        assert_eq!(kpi.load_spread, 0);
        assert_eq!(kpi.used_days, 0);
        assert!((kpi.avg_load - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_unknown_subject_weighs_nothing() {
        let tt = Timetable::from_days([vec!["Math", "Ghost"]]);
        let kpi = TimetableKpi::calculate(&tt, &instance());
        assert_eq!(kpi.day_loads, vec![7]);
    }

    #[test]
    fn test_meets_spread() {
        let tt = Timetable::from_days([vec!["Math"], vec!["English", "Art"]]);
        let kpi = TimetableKpi::calculate(&tt, &instance());
        assert!(kpi.meets_spread(3));
        assert!(!kpi.meets_spread(2));
    }
}
