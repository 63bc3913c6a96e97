//! Error types for board domain validation.

use super::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A schedule's due date precedes its start date.
    #[error("invalid date range: due date {due} precedes start date {start}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested due date.
        due: NaiveDate,
    },

    /// A progress percentage exceeds 100.
    #[error("invalid progress {0}, expected a value between 0 and 100")]
    InvalidProgress(u8),

    /// A pipeline was constructed without any steps.
    #[error("pipeline must contain at least one step")]
    EmptyPipeline,

    /// Two pipeline steps share the same step order.
    #[error("duplicate pipeline step order {0}")]
    DuplicateStepOrder(u32),

    /// A subtask was asked to take a column position.
    #[error("task {0} is a subtask and does not participate in column ordering")]
    SubtaskNotOrderable(TaskId),
}
