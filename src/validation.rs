//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a problem instance before any search.
//! Detects:
//! - Day count or capacity below 1, day count above `MAX_DAYS`
//! - Duplicate subject IDs
//! - Blank subject IDs
//! - Difficulties outside 1–7
//!
//! Whether capacity × days covers the subjects is deliberately not checked:
//! a too-small window is a well-formed instance that solves to infeasible.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{ProblemInstance, MAX_DAYS, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two subjects share the same ID.
    DuplicateId,
    /// A subject ID is empty or whitespace.
    EmptyId,
    /// A difficulty lies outside 1–7.
    DifficultyOutOfRange,
    /// The window has no days or more than `MAX_DAYS`.
    InvalidDayCount,
    /// Days accept no subjects.
    InvalidCapacity,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. At least one day, at most `MAX_DAYS`
/// 2. Capacity of at least one subject per day
/// 3. No blank subject IDs
/// 4. No duplicate subject IDs
/// 5. Every difficulty within 1–7
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.num_days < 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDayCount,
            format!("Day count must be at least 1, got {}", instance.num_days),
        ));
    } else if instance.num_days > MAX_DAYS {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDayCount,
            format!(
                "Day count must be at most {MAX_DAYS}, got {}",
                instance.num_days
            ),
        ));
    }

    if instance.max_per_day < 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCapacity,
            format!(
                "Max subjects per day must be at least 1, got {}",
                instance.max_per_day
            ),
        ));
    }

    let mut ids = HashSet::new();
    for (i, subject) in instance.subjects.iter().enumerate() {
        if subject.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Subject #{} has a blank ID", i + 1),
            ));
        } else if !ids.insert(subject.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", subject.id),
            ));
        }

        if !subject.has_valid_difficulty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DifficultyOutOfRange,
                format!(
                    "Subject '{}' has difficulty {} (expected {}..={})",
                    subject.id, subject.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;

    fn sample_instance() -> ProblemInstance {
        ProblemInstance::new(4, 2)
            .with_subject(Subject::new("Korean", 4))
            .with_subject(Subject::new("Math", 7))
            .with_subject(Subject::new("English", 3))
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_empty_subject_list_is_valid() {
        assert!(validate_instance(&ProblemInstance::new(1, 1)).is_ok());
    }

    #[test]
    fn test_overfull_window_is_valid() {
        // 3 subjects, 1 slot: infeasible, but well-formed
        let inst = ProblemInstance::new(1, 1)
            .with_subject(Subject::new("A", 1))
            .with_subject(Subject::new("B", 1))
            .with_subject(Subject::new("C", 1));
        assert!(validate_instance(&inst).is_ok());
    }

    #[test]
    fn test_zero_days() {
        let mut inst = sample_instance();
        inst.num_days = 0;
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidDayCount));
    }

    #[test]
    fn test_oversized_window() {
        let mut inst = sample_instance();
        inst.num_days = usize::MAX / 8;
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidDayCount));

        inst.num_days = MAX_DAYS;
        assert!(validate_instance(&inst).is_ok());
    }

    #[test]
    fn test_zero_capacity() {
        let mut inst = sample_instance();
        inst.max_per_day = 0;
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCapacity));
    }

    #[test]
    fn test_duplicate_subject_id() {
        let inst = sample_instance().with_subject(Subject::new("Math", 2));
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("Math")));
    }

    #[test]
    fn test_blank_subject_id() {
        let inst = sample_instance().with_subject(Subject::new("  ", 2));
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyId));
    }

    #[test]
    fn test_difficulty_out_of_range() {
        let inst = sample_instance()
            .with_subject(Subject::new("Physics", 0))
            .with_subject(Subject::new("Biology", 8));
        let errors = validate_instance(&inst).unwrap_err();
        let count = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::DifficultyOutOfRange)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_multiple_errors() {
        let mut inst = sample_instance().with_subject(Subject::new("Korean", 9));
        inst.num_days = 0;
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
