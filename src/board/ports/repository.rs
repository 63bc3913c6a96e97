//! Store port for task persistence and column reads.

use crate::board::domain::{StatusId, Task, TaskId, TaskWrite};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Implementations must make [`TaskStore::apply`] atomic: either every
/// write in the batch is persisted or none is. The engine relies on this to
/// keep intermediate states (an opened slot without the moved task placed, a
/// half-cascaded subtree) invisible to other readers. Writes are
/// field-scoped ([`TaskWrite`]), so a batch staged from a stale snapshot
/// only overwrites the fields its mutation class owns.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists.
    async fn insert(&self, task: &Task) -> TaskStoreResult<()>;

    /// Persists a batch of field-scoped writes atomically.
    ///
    /// Writes apply in order, so later writes in the batch observe the
    /// effect of earlier ones on the same task. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when any write targets a task
    /// that does not exist; in that case no write from the batch is
    /// persisted.
    async fn apply(&self, writes: &[TaskWrite]) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns the root tasks of a column, ordered by stored position
    /// ascending with missing positions last, then by task id.
    async fn list_column(&self, status_id: StatusId) -> TaskStoreResult<Vec<Task>>;

    /// Returns the direct children of a task, ordered by task id.
    async fn children_of(&self, parent_id: TaskId) -> TaskStoreResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure; transient and safe to retry.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
