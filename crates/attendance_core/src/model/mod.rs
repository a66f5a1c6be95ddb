//! Attendance domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core attendance logic.
//! - Own the per-(date, period) ledger and its derived aggregates.
//!
//! # Invariants
//! - A missing ledger entry means "present"; there is no unknown state.
//! - `Period` values are always inside `1..=7`.
//! - `DateKey` values are always real calendar dates in `YYYY-MM-DD` form.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod aggregate;
pub mod calendar;
pub mod ledger;
pub mod student;

/// Validation errors raised when building model values from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Period number outside `1..=7`.
    InvalidPeriod(i64),
    /// Text that is not an ISO `YYYY-MM-DD` calendar date.
    InvalidDateKey(String),
    /// Student identifier is blank after trimming.
    EmptyStudentId,
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPeriod(value) => {
                write!(f, "period must be between 1 and 7, got {value}")
            }
            Self::InvalidDateKey(value) => {
                write!(f, "date must be an ISO calendar date (YYYY-MM-DD), got `{value}`")
            }
            Self::EmptyStudentId => write!(f, "student id cannot be empty"),
        }
    }
}

impl Error for ModelError {}
