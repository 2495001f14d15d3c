//! Error types.
//!
//! Infeasibility is not an error: it is a regular `SolveOutcome`. Errors here
//! are malformed input (rejected before search) and persistence failures,
//! which are kept apart from solving.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by the solve operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The instance failed validation; no search was attempted.
    #[error("invalid instance: {}", join_messages(.0))]
    InvalidInstance(Vec<ValidationError>),
}

impl SolveError {
    /// The validation errors behind an `InvalidInstance` rejection.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidInstance(errors) => errors,
        }
    }
}

/// The history store could not be read or written.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// I/O failure on the backing file.
    #[error("history file {path} is not accessible: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored history is not a valid record list.
    #[error("history file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode run record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("history store lock poisoned")]
    Poisoned,
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
