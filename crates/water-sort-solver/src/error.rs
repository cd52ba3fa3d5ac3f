//! Error types shared by the solver library and the CLI.

use std::path::PathBuf;

use crate::puzzle::Move;

/// Errors that can occur while loading, validating, solving or replaying a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("search resource exhausted: {stored_states} stored states reached the limit of {limit}")]
    SearchResourceExhausted { stored_states: usize, limit: usize },

    #[error("move {index} ({mv}) is not legal: {reason}")]
    InvalidMove {
        index: usize,
        mv: Move,
        reason: String,
    },

    #[error("failed to read puzzle from {path}: {source}")]
    PuzzleRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse puzzle JSON: {0}")]
    PuzzleParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolverError {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        SolverError::InvalidState {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
