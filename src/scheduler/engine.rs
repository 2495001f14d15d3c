//! The solve operation.
//!
//! Validates the instance, builds the CP model, runs the solver and shapes
//! the result. Infeasibility is an ordinary outcome; only malformed input is
//! an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::cp::{BacktrackingSolver, SearchStats, SolveStatus, SolverConfig, TimetableCpBuilder};
use crate::error::SolveError;
use crate::models::{Assignment, ProblemInstance, Timetable};
use crate::validation::validate_instance;

/// A solved timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Subjects per day (input order within a day).
    pub timetable: Timetable,
    /// Day per subject (input order).
    pub assignment: Assignment,
    /// Load spread for the `Balanced` scenario, `None` otherwise.
    pub objective: Option<u32>,
    /// `Optimal` (Balanced) or `Feasible`.
    pub status: SolveStatus,
    /// Search effort.
    pub stats: SearchStats,
}

/// Why no timetable was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfeasibleReason {
    /// No assignment satisfies the constraints.
    NoAssignment,
    /// The configured node limit ran out first.
    NodeLimit,
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAssignment => f.write_str(
                "no timetable satisfies the constraints; \
                 relax days, capacity or weekend exclusion",
            ),
            Self::NodeLimit => f.write_str("search limit reached before a timetable was proven"),
        }
    }
}

/// Result of a solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A complete timetable.
    Solved(Solution),
    /// No timetable.
    Infeasible(InfeasibleReason),
}

impl SolveOutcome {
    /// The solution, if solved.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved(s) => Some(s),
            Self::Infeasible(_) => None,
        }
    }

    /// The timetable, if solved.
    pub fn timetable(&self) -> Option<&Timetable> {
        self.solution().map(|s| &s.timetable)
    }

    /// Whether no timetable was found.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible(_))
    }
}

/// Exam timetable scheduler.
///
/// Holds only configuration; every `solve` call owns its search state, so a
/// shared scheduler may serve concurrent callers.
///
/// # Example
///
/// ```
/// use u_timetable::models::{ProblemInstance, Scenario, Subject};
/// use u_timetable::scheduler::{SolveOutcome, TimetableScheduler};
///
/// let instance = ProblemInstance::new(2, 2)
///     .with_subject(Subject::new("Math", 7))
///     .with_subject(Subject::new("Art", 1))
///     .with_scenario(Scenario::EasyFirst);
///
/// let outcome = TimetableScheduler::new().solve(&instance).unwrap();
/// let timetable = outcome.timetable().unwrap();
/// assert!(timetable.day_of("Art") <= timetable.day_of("Math"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableScheduler {
    config: SolverConfig,
}

impl TimetableScheduler {
    /// Creates a scheduler with an unlimited search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Solver configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves an instance.
    ///
    /// # Errors
    /// `SolveError::InvalidInstance` if validation fails; no search runs.
    pub fn solve(&self, instance: &ProblemInstance) -> Result<SolveOutcome, SolveError> {
        validate_instance(instance).map_err(|errors| {
            warn!(errors = errors.len(), "rejected invalid instance");
            SolveError::InvalidInstance(errors)
        })?;

        let builder = TimetableCpBuilder::new(instance);
        let (timetable, solution) = builder.solve(&BacktrackingSolver::new(), &self.config);

        let outcome = match (timetable, solution.assignment) {
            (Some(timetable), Some(assignment)) => SolveOutcome::Solved(Solution {
                timetable,
                assignment,
                objective: solution.objective,
                status: solution.status,
                stats: solution.stats,
            }),
            _ if solution.status == SolveStatus::NodeLimit => {
                SolveOutcome::Infeasible(InfeasibleReason::NodeLimit)
            }
            _ => SolveOutcome::Infeasible(InfeasibleReason::NoAssignment),
        };

        info!(
            scenario = instance.scenario.key(),
            subjects = instance.subject_count(),
            days = instance.num_days,
            status = ?solution.status,
            nodes = solution.stats.nodes,
            "timetable solve finished"
        );

        Ok(outcome)
    }
}

/// Solves an instance with the default configuration.
pub fn solve(instance: &ProblemInstance) -> Result<SolveOutcome, SolveError> {
    TimetableScheduler::new().solve(instance)
}
