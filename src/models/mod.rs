//! Timetabling domain models.
//!
//! Provides the data types for describing an exam timetabling problem and
//! its solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | u-schedule | Meaning |
//! |-------------|------------|---------|
//! | Subject | Task | One exam, weighted by difficulty |
//! | Day | Time slot | Discrete day index in the window |
//! | Assignment | Assignment | Subject → day decision |
//! | Timetable | Schedule | Subjects grouped per day |

mod canonical;
mod instance;
mod subject;
mod timetable;

pub use canonical::CanonicalForm;
pub use instance::{ParseScenarioError, ProblemInstance, Scenario, MAX_DAYS, WEEKEND_DAYS};
pub use subject::{Subject, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use timetable::{Assignment, Timetable, Violation, ViolationType};
