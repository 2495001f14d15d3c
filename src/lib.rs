//! Exam timetabling for the U-Engine ecosystem.
//!
//! Assigns subjects, each weighted by a difficulty of 1–7, to exam days
//! under a per-day capacity and an optional weekend exclusion. One of three
//! scenarios shapes the result: harder subjects first, easier subjects
//! first, or difficulty balanced across days (the only scenario that is
//! optimized rather than merely satisfied).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Subject`, `Scenario`, `ProblemInstance`,
//!   `Assignment`, `Timetable`, `CanonicalForm`, `Violation`
//! - **`validation`**: Input integrity checks (duplicate IDs, difficulty range,
//!   day count and capacity)
//! - **`cp`**: Constraint model builder and the backtracking /
//!   branch-and-bound solver
//! - **`scheduler`**: The solve operation and timetable KPIs
//! - **`history`**: Run records, history stores and the popularity query
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{ProblemInstance, Scenario, Subject};
//! use u_timetable::scheduler::{solve, SolveOutcome};
//!
//! let instance = ProblemInstance::new(2, 1)
//!     .with_subject(Subject::new("Math", 3))
//!     .with_subject(Subject::new("English", 3))
//!     .with_scenario(Scenario::Balanced);
//!
//! match solve(&instance).unwrap() {
//!     SolveOutcome::Solved(solution) => assert_eq!(solution.objective, Some(0)),
//!     SolveOutcome::Infeasible(reason) => panic!("unexpected: {reason}"),
//! }
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

pub mod cp;
pub mod error;
pub mod history;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{HistoryError, SolveError};
