//! The solve operation and timetable KPI evaluation.
//!
//! # Algorithm
//!
//! `TimetableScheduler` validates the instance, builds the CP model through
//! `cp::TimetableCpBuilder` and runs `cp::BacktrackingSolver`: first-feasible
//! search for the ordering scenarios, branch-and-bound for `Balanced`.
//!
//! # KPI
//!
//! `TimetableKpi` computes per-day load metrics of a result.

mod engine;
mod kpi;

pub use engine::{solve, InfeasibleReason, Solution, SolveOutcome, TimetableScheduler};
pub use kpi::TimetableKpi;
