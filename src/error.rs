//! Error types for projection and storage operations

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias for engine operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Validation failures on a single position.
///
/// None of these are transient: retrying with the same input fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Regime code does not name one of the supported indexation regimes
    #[error("Invalid index regime: {0}")]
    InvalidRegime(String),

    /// Due date is not strictly after the start date
    #[error("Invalid period: due date {due} is not after start date {start}")]
    InvalidPeriod { start: NaiveDate, due: NaiveDate },

    /// Principal must be strictly positive
    #[error("Invalid principal: {0} (must be greater than zero)")]
    InvalidPrincipal(f64),
}

/// Failures raised by the in-memory collaborator stores
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Position {0} not found")]
    NotFound(u64),

    #[error("Position id {0} appears more than once")]
    DuplicateId(u64),
}
