//! In-memory task store for board engine tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{StatusId, Task, TaskId, TaskWrite},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored tasks across all columns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the backing lock is
    /// poisoned.
    pub fn task_count(&self) -> TaskStoreResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.len())
    }
}

/// Ranks stored positions ascending with missing positions last, breaking
/// ties by task id.
fn column_rank(task: &Task) -> (u64, uuid::Uuid) {
    let rank = task
        .order_in_status()
        .map_or(u64::MAX, u64::from);
    (rank, task.id().into_inner())
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        if state.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn apply(&self, writes: &[TaskWrite]) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;

        // Stage the whole batch before committing anything so a missing task
        // or a rejected write cannot leave a partially applied batch behind.
        // Staging sequentially lets later writes observe earlier ones on the
        // same task.
        let mut staged: HashMap<TaskId, Task> = HashMap::with_capacity(writes.len());
        for write in writes {
            let task_id = write.task_id();
            let mut task = match staged.get(&task_id).or_else(|| state.get(&task_id)) {
                Some(task) => task.clone(),
                None => return Err(TaskStoreError::NotFound(task_id)),
            };
            task.apply_write(write)
                .map_err(TaskStoreError::persistence)?;
            staged.insert(task_id, task);
        }
        for (task_id, task) in staged {
            state.insert(task_id, task);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }

    async fn list_column(&self, status_id: StatusId) -> TaskStoreResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        let mut column: Vec<Task> = state
            .values()
            .filter(|task| task.is_root() && task.status_id() == status_id)
            .cloned()
            .collect();
        column.sort_by_key(column_rank);
        Ok(column)
    }

    async fn children_of(&self, parent_id: TaskId) -> TaskStoreResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        let mut children: Vec<Task> = state
            .values()
            .filter(|task| task.parent_id() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|task| task.id().into_inner());
        Ok(children)
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }
}
