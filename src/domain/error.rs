//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe puzzle input that cannot be solved.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("input is empty")]
    EmptyInput,

    #[error("invalid grid cell {found:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, found: char },

    #[error("ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile repeats must be at least 1, got {0}")]
    InvalidRepeats(usize),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("invalid target area: {0}")]
    InvalidTarget(String),

    #[error("infinitely many pixels lit after {steps} steps")]
    InfiniteImage { steps: usize },
}

impl DomainError {
    /// Parse error for a whole line (column 1).
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column: 1,
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
