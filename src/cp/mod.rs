//! CP-based timetabling formulation.
//!
//! Builds a `CpModel` from a problem instance — one day variable per subject,
//! capacity and weekend constraints, scenario ordering or the balancing
//! objective — and solves it with a `CpSolver`.
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod model;
mod solver;

pub use model::{load_spread, Constraint, CpModel, DayVar, Objective};
pub use solver::{
    BacktrackingSolver, CpSolution, CpSolver, SearchPhase, SearchStats, SolveStatus, SolverConfig,
};

use tracing::debug;

use crate::models::{ProblemInstance, Scenario, Timetable};

/// Builds a CP model from a problem instance.
///
/// # Example
/// ```
/// use u_timetable::cp::{BacktrackingSolver, SolverConfig, TimetableCpBuilder};
/// use u_timetable::models::{ProblemInstance, Scenario, Subject};
///
/// let instance = ProblemInstance::new(2, 2)
///     .with_subject(Subject::new("Math", 7))
///     .with_subject(Subject::new("Art", 1))
///     .with_scenario(Scenario::HardFirst);
/// let builder = TimetableCpBuilder::new(&instance);
/// let model = builder.build();
/// assert_eq!(model.variable_count(), 2);
/// assert!(model.has_precedence(0, 1));
///
/// let (timetable, solution) = builder.solve(&BacktrackingSolver::new(), &SolverConfig::default());
/// assert!(solution.is_solution_found());
/// assert_eq!(timetable.unwrap().subject_count(), 2);
/// ```
pub struct TimetableCpBuilder<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> TimetableCpBuilder<'a> {
    /// Creates a new CP builder.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    /// Builds the CP model.
    ///
    /// Creates:
    /// - A day variable per subject, in input order
    /// - A `Capacity` constraint per day
    /// - `ForbiddenDay` constraints for weekend days inside the window
    /// - `Precedence` constraints for each strictly ordered pair
    ///   (`HardFirst` / `EasyFirst`)
    /// - `MinimizeLoadSpread` objective (`Balanced`)
    pub fn build(&self) -> CpModel {
        let inst = self.instance;
        let mut model = CpModel::new(inst.scenario.key(), inst.num_days);

        for subject in &inst.subjects {
            model.add_variable(&subject.id, u32::from(subject.difficulty));
        }

        for day in 0..inst.num_days {
            model.add_capacity(day, inst.max_per_day);
        }

        for day in inst.forbidden_days() {
            model.add_forbidden_day(day);
        }

        match inst.scenario {
            Scenario::HardFirst | Scenario::EasyFirst => {
                for (i, a) in inst.subjects.iter().enumerate() {
                    for (j, b) in inst.subjects.iter().enumerate() {
                        if inst.scenario.requires_before(a.difficulty, b.difficulty) {
                            model.add_precedence(i, j);
                        }
                    }
                }
            }
            Scenario::Balanced => model.set_objective(Objective::MinimizeLoadSpread),
        }

        debug!(
            scenario = inst.scenario.key(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            precedences = model.precedence_count(),
            "built timetable model"
        );

        model
    }

    /// Solves the instance and returns the timetable (if any) with the raw solution.
    pub fn solve<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> (Option<Timetable>, CpSolution) {
        let model = self.build();
        let solution = solver.solve(&model, config);
        let timetable = solution
            .assignment
            .as_ref()
            .map(|a| a.to_timetable(&self.instance.subjects, self.instance.num_days));
        (timetable, solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Subject};

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("Math", 7),
            Subject::new("English", 3),
            Subject::new("Korean", 3),
            Subject::new("Art", 1),
        ]
    }

    #[test]
    fn test_build_model_sizes() {
        let inst = ProblemInstance::new(4, 2).with_subjects(subjects());
        let model = TimetableCpBuilder::new(&inst).build();
        assert_eq!(model.variable_count(), 4);
        assert_eq!(model.num_days(), 4);
        // 4 capacity + 5 ordered pairs (Math>3x, English>Art, Korean>Art)
        assert_eq!(model.precedence_count(), 5);
        assert_eq!(model.constraint_count(), 9);
        assert!(model.objective().is_none());
    }

    #[test]
    fn test_hard_first_direction() {
        let inst = ProblemInstance::new(4, 2).with_subjects(subjects());
        let model = TimetableCpBuilder::new(&inst).build();
        assert!(model.has_precedence(0, 3)); // Math before Art
        assert!(!model.has_precedence(3, 0));
    }

    #[test]
    fn test_easy_first_direction() {
        let inst = ProblemInstance::new(4, 2)
            .with_subjects(subjects())
            .with_scenario(Scenario::EasyFirst);
        let model = TimetableCpBuilder::new(&inst).build();
        assert!(model.has_precedence(3, 0)); // Art before Math
        assert!(!model.has_precedence(0, 3));
        assert_eq!(model.precedence_count(), 5);
    }

    #[test]
    fn test_ties_impose_no_precedence() {
        for scenario in Scenario::ALL {
            let inst = ProblemInstance::new(4, 2)
                .with_subjects(subjects())
                .with_scenario(scenario);
            let model = TimetableCpBuilder::new(&inst).build();
            assert!(!model.has_precedence(1, 2));
            assert!(!model.has_precedence(2, 1));
        }
    }

    #[test]
    fn test_balanced_has_objective_and_no_precedence() {
        let inst = ProblemInstance::new(3, 2)
            .with_subjects(subjects())
            .with_scenario(Scenario::Balanced);
        let model = TimetableCpBuilder::new(&inst).build();
        assert_eq!(model.objective(), Some(Objective::MinimizeLoadSpread));
        assert_eq!(model.precedence_count(), 0);
    }

    #[test]
    fn test_weekend_only_inside_window() {
        let short = ProblemInstance::new(5, 1)
            .with_subjects(subjects())
            .with_weekend_excluded(true);
        let model = TimetableCpBuilder::new(&short).build();
        assert!(!model
            .constraints()
            .iter()
            .any(|c| matches!(c, Constraint::ForbiddenDay { .. })));

        let week = ProblemInstance::new(7, 1)
            .with_subjects(subjects())
            .with_weekend_excluded(true);
        let model = TimetableCpBuilder::new(&week).build();
        let forbidden: Vec<usize> = model
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::ForbiddenDay { day } => Some(*day),
                _ => None,
            })
            .collect();
        assert_eq!(forbidden, vec![5, 6]);
        assert!(!model.is_feasible(&Assignment::new(vec![5, 0, 1, 2])));
    }

    #[test]
    fn test_solve_decodes_timetable() {
        let inst = ProblemInstance::new(2, 2).with_subjects(subjects());
        let builder = TimetableCpBuilder::new(&inst);
        let (timetable, solution) =
            builder.solve(&BacktrackingSolver::new(), &SolverConfig::default());
        assert_eq!(solution.status, SolveStatus::Feasible);
        let tt = timetable.unwrap();
        assert_eq!(tt.day_count(), 2);
        assert_eq!(tt.subject_count(), 4);
        // Math first, Art last
        assert_eq!(tt.day_of("Math"), Some(0));
        assert_eq!(tt.day_of("Art"), Some(1));
    }
}
