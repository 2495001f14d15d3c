//! Problem instance and scenario selection.
//!
//! A `ProblemInstance` is built per solve call from validated external input
//! and discarded afterwards. Subject order is input order: it carries no
//! constraint meaning but fixes the search order, which makes results
//! reproducible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::Subject;

/// Day indices treated as the weekend (6th and 7th day of the window).
pub const WEEKEND_DAYS: [usize; 2] = [5, 6];

/// Longest accepted window, in days.
pub const MAX_DAYS: usize = 366;

/// Ordering / objective policy applied to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Harder subjects are never scheduled after easier ones.
    #[serde(alias = "초반에 어려운 과목 몰아서 끝내기")]
    HardFirst,
    /// Easier subjects are never scheduled after harder ones.
    #[serde(alias = "쉬운 과목 먼저 배치")]
    EasyFirst,
    /// Minimize the spread between the heaviest and lightest day.
    #[serde(alias = "난이도 고르게 분산")]
    Balanced,
}

impl Scenario {
    /// All scenarios in display order.
    pub const ALL: [Scenario; 3] = [Scenario::HardFirst, Scenario::EasyFirst, Scenario::Balanced];

    /// Short machine-friendly key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::HardFirst => "hard-first",
            Self::EasyFirst => "easy-first",
            Self::Balanced => "balanced",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HardFirst => "Front-load harder subjects",
            Self::EasyFirst => "Front-load easier subjects",
            Self::Balanced => "Balance difficulty across days",
        }
    }

    /// Label stored by legacy Korean history files.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Self::HardFirst => "초반에 어려운 과목 몰아서 끝내기",
            Self::EasyFirst => "쉬운 과목 먼저 배치",
            Self::Balanced => "난이도 고르게 분산",
        }
    }

    /// Whether the scenario has an objective to minimize.
    pub fn is_optimizing(&self) -> bool {
        matches!(self, Self::Balanced)
    }

    /// Whether `day(a) <= day(b)` is required for subjects with these difficulties.
    ///
    /// Equal difficulties never impose an order.
    pub fn requires_before(&self, difficulty_a: u8, difficulty_b: u8) -> bool {
        match self {
            Self::HardFirst => difficulty_a > difficulty_b,
            Self::EasyFirst => difficulty_a < difficulty_b,
            Self::Balanced => false,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown scenario name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario '{0}' (expected hard-first, easy-first or balanced)")]
pub struct ParseScenarioError(pub String);

impl FromStr for Scenario {
    type Err = ParseScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Scenario::ALL
            .into_iter()
            .find(|sc| {
                sc.key().eq_ignore_ascii_case(trimmed)
                    || sc.label().eq_ignore_ascii_case(trimmed)
                    || sc.legacy_label() == trimmed
            })
            .ok_or_else(|| ParseScenarioError(s.to_string()))
    }
}

/// One timetabling problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Subjects in input order.
    pub subjects: Vec<Subject>,
    /// Number of days in the window (≥ 1).
    pub num_days: usize,
    /// Maximum subjects per day (≥ 1).
    pub max_per_day: usize,
    /// Forbid day indices 5 and 6 when they exist.
    pub exclude_weekend: bool,
    /// Active scenario.
    pub scenario: Scenario,
}

impl ProblemInstance {
    /// Creates an empty instance with the `HardFirst` scenario and no
    /// weekend exclusion.
    pub fn new(num_days: usize, max_per_day: usize) -> Self {
        Self {
            subjects: Vec::new(),
            num_days,
            max_per_day,
            exclude_weekend: false,
            scenario: Scenario::HardFirst,
        }
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Replaces the subject list.
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Sets the weekend exclusion flag.
    pub fn with_weekend_excluded(mut self, exclude: bool) -> Self {
        self.exclude_weekend = exclude;
        self
    }

    /// Sets the scenario.
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Number of subjects.
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Sum of all difficulties.
    pub fn total_difficulty(&self) -> u32 {
        self.subjects.iter().map(|s| u32::from(s.difficulty)).sum()
    }

    /// Subject ID → difficulty.
    pub fn difficulty_map(&self) -> BTreeMap<String, u8> {
        self.subjects
            .iter()
            .map(|s| (s.id.clone(), s.difficulty))
            .collect()
    }

    /// Days no subject may use. Empty unless weekend exclusion is set and
    /// the window reaches index 5.
    pub fn forbidden_days(&self) -> Vec<usize> {
        if !self.exclude_weekend {
            return Vec::new();
        }
        WEEKEND_DAYS
            .into_iter()
            .filter(|&d| d < self.num_days)
            .collect()
    }

    /// Whether a day is usable at all.
    pub fn is_open_day(&self, day: usize) -> bool {
        day < self.num_days && !(self.exclude_weekend && WEEKEND_DAYS.contains(&day))
    }

    /// Total number of slots over the open days.
    pub fn slot_capacity(&self) -> usize {
        (0..self.num_days).filter(|&d| self.is_open_day(d)).count() * self.max_per_day
    }
}
