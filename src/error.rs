//! Error types for the simulation core

use thiserror::Error;

/// Which coordinate an out-of-range index referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Errors raised by rows, row sequences and the board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An index outside `0..len`. Never clamped.
    #[error("{axis} index {index} out of range 0..{len}")]
    OutOfRange { axis: Axis, index: usize, len: usize },

    /// Rejected at construction time; nothing is partially built.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The row sequence no longer holds exactly `height` rows.
    /// This is a bug in the core and must not be retried.
    #[error("row sequence holds {actual} rows, expected {expected}")]
    InvariantViolation { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Bounds check shared by every indexed accessor
pub(crate) fn check_index(axis: Axis, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(EngineError::OutOfRange { axis, index, len })
    }
}
