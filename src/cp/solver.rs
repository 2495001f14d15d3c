//! Backtracking / branch-and-bound solver for day-assignment models.
//!
//! # Algorithm
//!
//! Depth-first search over variables in index order, trying days in
//! ascending order. After every decision the bounds of the open variables
//! are propagated to a fixpoint:
//!
//! 1. **Capacity / forbidden days**: `lo` and `hi` skip days that are
//!    forbidden or already full.
//! 2. **Precedence** `day(b) <= day(a)`: `lo[a] >= lo[b]`, `hi[b] <= hi[a]`.
//! 3. **Slot count**: the open variables must fit in the free slots.
//!
//! A wiped-out domain (`lo > hi`) ends the branch.
//!
//! Without an objective the first complete assignment is returned. With
//! `MinimizeLoadSpread` the search continues as branch-and-bound: a branch
//! is cut when its lower bound on the final spread is not below the
//! incumbent. Only strictly better solutions replace the incumbent, so the
//! returned assignment is the lexicographically first optimal one.
//!
//! # Complexity
//! O(D^n) worst case for n variables over D days; propagation keeps the
//! explored tree far smaller for the instance sizes this crate targets.
//!
//! # Reference
//! - Land & Doig (1960), "An automatic method of solving discrete
//!   programming problems"
//! - Haralick & Elliott (1980), "Increasing tree search efficiency for
//!   constraint satisfaction problems" (forward checking)

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

use super::model::{load_spread, Constraint, CpModel, Objective};
use crate::models::Assignment;

/// Solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of search nodes (day decisions). `None` = unlimited.
    ///
    /// Hitting the limit yields `SolveStatus::NodeLimit` without an
    /// assignment, never an uncertified one.
    pub node_limit: Option<u64>,
}

impl SolverConfig {
    /// Unlimited search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Terminal status of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Objective minimized and optimality proven.
    Optimal,
    /// A feasible assignment (model without objective).
    Feasible,
    /// Search space exhausted without a feasible assignment.
    Infeasible,
    /// Node limit reached before the search could finish.
    NodeLimit,
}

impl SolveStatus {
    /// Whether an assignment was produced.
    pub fn is_solution_found(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

/// Search phase, reported in trace logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Model compiled, nothing decided yet.
    Initialized,
    /// Tightening bounds after a decision.
    Propagating,
    /// Choosing the next day for the next variable.
    Branching,
    /// Terminal: assignment found (and proven optimal, if optimizing).
    Solved,
    /// Terminal: nothing left to explore, or the node limit was hit.
    Exhausted,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initialized => "initialized",
            Self::Propagating => "propagating",
            Self::Branching => "branching",
            Self::Solved => "solved",
            Self::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}

/// Search effort counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Day decisions tried.
    pub nodes: u64,
    /// Decisions rejected by propagation or bounding.
    pub backtracks: u64,
    /// Complete assignments accepted as incumbent.
    pub solutions: u64,
}

/// Result of solving a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpSolution {
    /// Terminal status.
    pub status: SolveStatus,
    /// Assignment, present iff `status.is_solution_found()`.
    pub assignment: Option<Assignment>,
    /// Objective value of the assignment (models with an objective only).
    pub objective: Option<u32>,
    /// Search effort.
    pub stats: SearchStats,
}

impl CpSolution {
    /// Whether an assignment was produced.
    pub fn is_solution_found(&self) -> bool {
        self.assignment.is_some()
    }
}

/// A solver for day-assignment models.
pub trait CpSolver {
    /// Solves the model to a terminal status.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Deterministic depth-first solver with propagation and branch-and-bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    /// Creates a solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BacktrackingSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let problem = CompiledModel::compile(model);
        debug!(
            model = %model.name,
            variables = problem.weights.len(),
            days = problem.num_days,
            precedences = problem.precedences.len(),
            optimize = problem.optimize,
            "starting search"
        );

        let mut search = Search::new(&problem, config.node_limit);
        search.run();
        search.finish(model)
    }
}

/// Solver-side view of a model: per-day tables instead of a constraint list.
#[derive(Debug)]
struct CompiledModel {
    num_days: usize,
    weights: Vec<u32>,
    open: Vec<bool>,
    capacity: Vec<usize>,
    precedences: Vec<(usize, usize)>,
    total_weight: u32,
    optimize: bool,
}

impl CompiledModel {
    fn compile(model: &CpModel) -> Self {
        let n = model.variable_count();
        let num_days = model.num_days();
        let mut open = vec![true; num_days];
        let mut capacity = vec![n; num_days];
        let mut precedences = Vec::new();

        for constraint in model.constraints() {
            match *constraint {
                Constraint::Capacity { day, max } => {
                    if let Some(c) = capacity.get_mut(day) {
                        *c = (*c).min(max);
                    }
                }
                Constraint::ForbiddenDay { day } => {
                    if let Some(o) = open.get_mut(day) {
                        *o = false;
                    }
                }
                Constraint::Precedence { before, after } => {
                    if before < n && after < n && before != after {
                        precedences.push((before, after));
                    }
                }
            }
        }

        Self {
            num_days,
            weights: model.variables().iter().map(|v| v.weight).collect(),
            open,
            capacity,
            precedences,
            total_weight: model.total_weight(),
            optimize: matches!(model.objective(), Some(Objective::MinimizeLoadSpread)),
        }
    }

    fn variable_count(&self) -> usize {
        self.weights.len()
    }
}

/// Inclusive day bounds per variable. Decided variables have `lo == hi`.
#[derive(Debug, Clone)]
struct Bounds {
    lo: Vec<usize>,
    hi: Vec<usize>,
}

struct Search<'a> {
    problem: &'a CompiledModel,
    node_limit: Option<u64>,
    /// Days of the decided prefix of variables.
    days: Vec<usize>,
    counts: Vec<usize>,
    loads: Vec<u32>,
    remaining_weight: u32,
    best: Option<(Vec<usize>, u32)>,
    stats: SearchStats,
    aborted: bool,
    phase: SearchPhase,
}

impl<'a> Search<'a> {
    fn new(problem: &'a CompiledModel, node_limit: Option<u64>) -> Self {
        Self {
            problem,
            node_limit,
            days: Vec::with_capacity(problem.variable_count()),
            counts: vec![0; problem.num_days],
            loads: vec![0; problem.num_days],
            remaining_weight: problem.total_weight,
            best: None,
            stats: SearchStats::default(),
            aborted: false,
            phase: SearchPhase::Initialized,
        }
    }

    fn run(&mut self) {
        let n = self.problem.variable_count();
        if self.problem.num_days == 0 {
            // Only the empty assignment fits an empty window.
            if n == 0 {
                self.best = Some((Vec::new(), 0));
                self.stats.solutions = 1;
            }
            return;
        }

        let mut root = Bounds {
            lo: vec![0; n],
            hi: vec![self.problem.num_days - 1; n],
        };
        self.enter(SearchPhase::Propagating);
        if self.propagate(&mut root, 0) {
            self.enter(SearchPhase::Branching);
            self.branch(0, &root);
        } else {
            trace!("root propagation failed");
        }
    }

    fn enter(&mut self, phase: SearchPhase) {
        if self.phase != phase {
            trace!(from = %self.phase, to = %phase, depth = self.days.len(), "phase");
            self.phase = phase;
        }
    }

    fn should_stop(&self) -> bool {
        self.aborted || (!self.problem.optimize && self.best.is_some())
    }

    #[inline]
    fn available(&self, day: usize) -> bool {
        self.problem.open[day] && self.counts[day] < self.problem.capacity[day]
    }

    fn branch(&mut self, var: usize, bounds: &Bounds) {
        if var == self.problem.variable_count() {
            self.record();
            return;
        }

        let weight = self.problem.weights[var];
        for day in bounds.lo[var]..=bounds.hi[var] {
            if !self.available(day) {
                continue;
            }
            if let Some(limit) = self.node_limit {
                if self.stats.nodes >= limit {
                    self.aborted = true;
                    return;
                }
            }
            self.stats.nodes += 1;

            self.days.push(day);
            self.counts[day] += 1;
            self.loads[day] += weight;
            self.remaining_weight -= weight;

            let mut child = bounds.clone();
            child.lo[var] = day;
            child.hi[var] = day;

            self.enter(SearchPhase::Propagating);
            if self.propagate(&mut child, var + 1) && self.may_improve(var + 1) {
                self.enter(SearchPhase::Branching);
                self.branch(var + 1, &child);
            } else {
                self.stats.backtracks += 1;
            }

            self.remaining_weight += weight;
            self.loads[day] -= weight;
            self.counts[day] -= 1;
            self.days.pop();

            if self.should_stop() {
                return;
            }
        }
    }

    /// Tightens bounds to a fixpoint. Variables `next..` are undecided.
    ///
    /// Returns `false` on a wiped-out domain or when the undecided
    /// variables cannot fit in the remaining slots.
    fn propagate(&self, bounds: &mut Bounds, next: usize) -> bool {
        let n = self.problem.variable_count();

        loop {
            let mut changed = false;

            for v in next..n {
                let (lo, hi) = (bounds.lo[v], bounds.hi[v]);
                let Some(new_lo) = (lo..=hi).find(|&d| self.available(d)) else {
                    return false;
                };
                let new_hi = (new_lo..=hi)
                    .rev()
                    .find(|&d| self.available(d))
                    .unwrap_or(new_lo);
                if new_lo != lo || new_hi != hi {
                    bounds.lo[v] = new_lo;
                    bounds.hi[v] = new_hi;
                    changed = true;
                }
            }

            for &(before, after) in &self.problem.precedences {
                if bounds.lo[after] < bounds.lo[before] {
                    bounds.lo[after] = bounds.lo[before];
                    changed = true;
                }
                if bounds.hi[before] > bounds.hi[after] {
                    bounds.hi[before] = bounds.hi[after];
                    changed = true;
                }
                if bounds.lo[after] > bounds.hi[after] || bounds.lo[before] > bounds.hi[before] {
                    return false;
                }
            }

            if !changed {
                break;
            }
        }

        let free_slots: usize = (0..self.problem.num_days)
            .filter(|&d| self.problem.open[d])
            .map(|d| self.problem.capacity[d].saturating_sub(self.counts[d]))
            .sum();
        n - next <= free_slots
    }

    /// Whether the partial assignment can still beat the incumbent.
    fn may_improve(&self, next: usize) -> bool {
        if !self.problem.optimize {
            return true;
        }
        match self.best {
            Some((_, best)) => self.lower_bound(next) < best,
            None => true,
        }
    }

    /// Lower bound on the final load spread.
    ///
    /// The final maximum is at least the current maximum and the average
    /// load; the final minimum is at most the average and at most what any
    /// day can still reach.
    fn lower_bound(&self, next: usize) -> u32 {
        let days = self.problem.num_days as u32;
        let total = self.problem.total_weight;
        let avg_floor = total / days;
        let avg_ceil = total.div_ceil(days);

        let max_now = self.loads.iter().copied().max().unwrap_or(0);
        let undecided = next < self.problem.variable_count();
        let min_reachable = (0..self.problem.num_days)
            .map(|d| {
                if undecided && self.available(d) {
                    self.loads[d] + self.remaining_weight
                } else {
                    self.loads[d]
                }
            })
            .min()
            .unwrap_or(0);

        max_now
            .max(avg_ceil)
            .saturating_sub(min_reachable.min(avg_floor))
    }

    fn record(&mut self) {
        let value = if self.problem.optimize {
            load_spread(&self.loads)
        } else {
            0
        };

        let improves = match self.best {
            Some((_, best)) => value < best,
            None => true,
        };
        if improves {
            trace!(objective = value, nodes = self.stats.nodes, "new incumbent");
            self.best = Some((self.days.clone(), value));
            self.stats.solutions += 1;
        }
    }

    fn finish(mut self, model: &CpModel) -> CpSolution {
        let outcome = if self.aborted {
            warn!(
                model = %model.name,
                nodes = self.stats.nodes,
                "node limit reached; reporting exhausted search"
            );
            self.enter(SearchPhase::Exhausted);
            (SolveStatus::NodeLimit, None, None)
        } else {
            match self.best.take() {
                Some((days, value)) => {
                    self.enter(SearchPhase::Solved);
                    if self.problem.optimize {
                        (SolveStatus::Optimal, Some(Assignment::new(days)), Some(value))
                    } else {
                        (SolveStatus::Feasible, Some(Assignment::new(days)), None)
                    }
                }
                None => {
                    self.enter(SearchPhase::Exhausted);
                    (SolveStatus::Infeasible, None, None)
                }
            }
        };

        debug!(
            model = %model.name,
            status = ?outcome.0,
            objective = ?outcome.2,
            nodes = self.stats.nodes,
            backtracks = self.stats.backtracks,
            "search finished"
        );

        CpSolution {
            status: outcome.0,
            assignment: outcome.1,
            objective: outcome.2,
            stats: self.stats,
        }
    }
}
