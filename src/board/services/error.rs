//! Engine-level error taxonomy shared by the board services.

use crate::board::domain::{BoardDomainError, TaskId};
use crate::board::ports::TaskStoreError;
use chrono::NaiveDate;
use thiserror::Error;

/// Result type for board engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Data-integrity violations that cannot be auto-corrected.
///
/// These are surfaced to the caller as alerts and must not be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// The parent/child graph contains a cycle.
    #[error("cycle detected in task hierarchy at task {0}")]
    CycleDetected(TaskId),

    /// A task with children was asked to be deleted.
    #[error("task {0} cannot be deleted while it has child tasks")]
    HasChildren(TaskId),

    /// A column operation targeted a subtask.
    #[error("task {0} is a subtask and cannot be placed in a column")]
    NotRootTask(TaskId),
}

/// Errors returned by the board engine services.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The referenced task does not exist. Not retried.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Store I/O failed mid-sequence. Safe to retry the whole operation:
    /// the reconciliation pass converges and the cascade is idempotent.
    #[error("transient store failure")]
    TransientStore(#[source] TaskStoreError),

    /// Invariant violation that cannot be auto-corrected. Not retried.
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),

    /// A date update where the due date precedes the start date. Rejected
    /// before any write.
    #[error("invalid date range: due date {due} precedes start date {start}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested due date.
        due: NaiveDate,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(BoardDomainError),
}

impl From<TaskStoreError> for EngineError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(id) => Self::NotFound(id),
            other => Self::TransientStore(other),
        }
    }
}

impl From<BoardDomainError> for EngineError {
    fn from(err: BoardDomainError) -> Self {
        match err {
            BoardDomainError::InvalidDateRange { start, due } => {
                Self::InvalidRange { start, due }
            }
            other => Self::Domain(other),
        }
    }
}
