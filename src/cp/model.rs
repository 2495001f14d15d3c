//! Constraint model for subject → day assignment.
//!
//! One integer variable per subject ranges over day indices. Hard
//! constraints restrict those values; an optional objective ranks the
//! feasible assignments.
//!
//! # Reference
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming", Ch. 3

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Violation, ViolationType};

/// An integer decision variable: the day of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayVar {
    /// Subject ID this variable decides.
    pub name: String,
    /// Weight contributed to the day load (the subject difficulty).
    pub weight: u32,
}

/// A hard constraint over day variables.
///
/// Variables are referenced by index (input order of subjects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// At most `max` variables take the value `day`.
    Capacity { day: usize, max: usize },

    /// No variable may take the value `day`.
    ForbiddenDay { day: usize },

    /// `day(before) <= day(after)`.
    Precedence { before: usize, after: usize },
}

/// Objective to minimize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Maximum day load minus minimum day load, over every day of the
    /// window (days without subjects count as load 0).
    MinimizeLoadSpread,
}

/// A constraint model: variables, hard constraints, optional objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpModel {
    /// Model name (for logging).
    pub name: String,
    num_days: usize,
    variables: Vec<DayVar>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl CpModel {
    /// Creates an empty model over days `0..num_days`.
    pub fn new(name: impl Into<String>, num_days: usize) -> Self {
        Self {
            name: name.into(),
            num_days,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a variable and returns its index.
    pub fn add_variable(&mut self, name: impl Into<String>, weight: u32) -> usize {
        self.variables.push(DayVar {
            name: name.into(),
            weight,
        });
        self.variables.len() - 1
    }

    /// Limits the number of variables on a day.
    pub fn add_capacity(&mut self, day: usize, max: usize) {
        self.constraints.push(Constraint::Capacity { day, max });
    }

    /// Forbids a day for every variable.
    pub fn add_forbidden_day(&mut self, day: usize) {
        self.constraints.push(Constraint::ForbiddenDay { day });
    }

    /// Requires `day(before) <= day(after)`.
    pub fn add_precedence(&mut self, before: usize, after: usize) {
        self.constraints.push(Constraint::Precedence { before, after });
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Number of days in the window.
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Variables in index order.
    pub fn variables(&self) -> &[DayVar] {
        &self.variables
    }

    /// All hard constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Objective, if any.
    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of hard constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of precedence constraints.
    pub fn precedence_count(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::Precedence { .. }))
            .count()
    }

    /// Whether `day(before) <= day(after)` is required.
    pub fn has_precedence(&self, before: usize, after: usize) -> bool {
        self.constraints.iter().any(|c| match c {
            Constraint::Precedence { before: b, after: a } => *b == before && *a == after,
            _ => false,
        })
    }

    /// Sum of all variable weights.
    pub fn total_weight(&self) -> u32 {
        self.variables.iter().map(|v| v.weight).sum()
    }

    /// Weight on each day under an assignment.
    pub fn day_loads(&self, assignment: &Assignment) -> Vec<u32> {
        let mut loads = vec![0u32; self.num_days];
        for (var, &day) in self.variables.iter().zip(assignment.days()) {
            if let Some(l) = loads.get_mut(day) {
                *l += var.weight;
            }
        }
        loads
    }

    /// Objective value of an assignment (`None` without an objective).
    pub fn evaluate(&self, assignment: &Assignment) -> Option<u32> {
        self.objective.map(|objective| match objective {
            Objective::MinimizeLoadSpread => load_spread(&self.day_loads(assignment)),
        })
    }

    /// Hard-constraint violations of an assignment.
    pub fn violations(&self, assignment: &Assignment) -> Vec<Violation> {
        let mut violations = Vec::new();
        let days = assignment.days();

        for (i, var) in self.variables.iter().enumerate() {
            match days.get(i) {
                None => violations.push(Violation::new(
                    ViolationType::Unassigned,
                    &var.name,
                    format!("Subject '{}' has no day", var.name),
                )),
                Some(&d) if d >= self.num_days => violations.push(Violation::new(
                    ViolationType::DayOutOfRange,
                    &var.name,
                    format!(
                        "Subject '{}' is on day {} of a {}-day window",
                        var.name, d, self.num_days
                    ),
                )),
                Some(_) => {}
            }
        }

        let counts = assignment.day_counts(self.num_days);
        for constraint in &self.constraints {
            match *constraint {
                Constraint::Capacity { day, max } => {
                    let count = counts.get(day).copied().unwrap_or(0);
                    if count > max {
                        violations.push(Violation::new(
                            ViolationType::CapacityExceeded,
                            day.to_string(),
                            format!("Day {day} holds {count} subjects (max {max})"),
                        ));
                    }
                }
                Constraint::ForbiddenDay { day } => {
                    for (var, _) in self
                        .variables
                        .iter()
                        .zip(days)
                        .filter(|(_, d)| **d == day)
                    {
                        violations.push(Violation::new(
                            ViolationType::ForbiddenDay,
                            &var.name,
                            format!("Subject '{}' is on excluded day {day}", var.name),
                        ));
                    }
                }
                Constraint::Precedence { before, after } => {
                    if let (Some(&db), Some(&da)) = (days.get(before), days.get(after)) {
                        if db > da {
                            let b = &self.variables[before].name;
                            let a = &self.variables[after].name;
                            violations.push(Violation::new(
                                ViolationType::OrderingViolation,
                                b,
                                format!(
                                    "Subject '{b}' (day {db}) must not come after '{a}' (day {da})"
                                ),
                            ));
                        }
                    }
                }
            }
        }

        violations
    }

    /// Whether an assignment satisfies every hard constraint.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        self.violations(assignment).is_empty()
    }
}

/// Maximum minus minimum of the loads (0 for no days).
pub fn load_spread(loads: &[u32]) -> u32 {
    match (loads.iter().max(), loads.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}
