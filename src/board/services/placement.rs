//! Position index maintenance for board columns.
//!
//! Keeps the `order_in_status` values of each column's root tasks contiguous
//! (`0..n-1`, no gaps, no duplicates) across moves, creation, and deletion.
//! Every mutation path ends in the same reconciliation diff, so the engine
//! self-heals columns whose stored positions were already inconsistent, and
//! re-running a move with the same target converges to the same state.

use crate::board::{
    domain::{
        ColumnOrder, ColumnRow, CompanyId, Schedule, StatusId, Task, TaskId, TaskWrite,
    },
    ports::TaskStore,
    services::{
        error::{EngineError, EngineResult, IntegrityViolation},
        locks::LockRegistry,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    status_id: StatusId,
    parent_id: Option<TaskId>,
    company_id: Option<CompanyId>,
    schedule: Schedule,
}

impl CreateTaskRequest {
    /// Creates a request for a new root task in the given column.
    #[must_use]
    pub const fn root(status_id: StatusId) -> Self {
        Self {
            status_id,
            parent_id: None,
            company_id: None,
            schedule: Schedule::unscheduled(),
        }
    }

    /// Creates a request for a new subtask under the given parent.
    #[must_use]
    pub const fn subtask_of(parent_id: TaskId, status_id: StatusId) -> Self {
        Self {
            status_id,
            parent_id: Some(parent_id),
            company_id: None,
            schedule: Schedule::unscheduled(),
        }
    }

    /// Sets the company the task belongs to.
    #[must_use]
    pub const fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Sets the schedule window.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }
}

/// Column placement orchestration service.
///
/// Operations touching the same column are serialised through an internal
/// lock registry, so one instance should be shared per store.
#[derive(Clone)]
pub struct PlacementService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    locks: Arc<LockRegistry>,
}

impl<S, C> PlacementService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new placement service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            locks: Arc::new(LockRegistry::new()),
        }
    }

    pub(crate) fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    pub(crate) fn locks(&self) -> &Arc<LockRegistry> {
        &self.locks
    }

    /// Creates a task and persists it.
    ///
    /// Root tasks append to the end of their column; subtasks inherit the
    /// parent's company and take no column position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when the requested parent does not
    /// exist and [`EngineError::TransientStore`] on store failure.
    pub async fn create_task(&self, request: CreateTaskRequest) -> EngineResult<Task> {
        let mut task = match request.parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(EngineError::NotFound(parent_id))?;
                Task::new_subtask(&parent, request.status_id, &*self.clock)
            }
            None => {
                let _guard = self.locks.acquire(request.status_id.into_inner()).await;
                let column = self.store.list_column(request.status_id).await?;
                let position = u32::try_from(column.len()).unwrap_or(u32::MAX);
                let mut task =
                    Task::new_root(request.status_id, position, request.company_id, &*self.clock);
                if request.schedule != Schedule::unscheduled() {
                    task.set_schedule(request.schedule, &*self.clock);
                }
                self.store.insert(&task).await?;
                return Ok(task);
            }
        };
        if let Some(company_id) = request.company_id {
            task.assign_company(company_id, &*self.clock);
        }
        if request.schedule != Schedule::unscheduled() {
            task.set_schedule(request.schedule, &*self.clock);
        }
        self.store.insert(&task).await?;
        Ok(task)
    }

    /// Moves a root task to a position in a column.
    ///
    /// The target position is clamped to `[0, n]` where `n` is the
    /// destination column's root-task count after removing the moved task
    /// when it stays in the same column. A move to the task's current
    /// position succeeds with zero writes. Both touched columns are
    /// renumbered to a contiguous `0..n-1`, healing any pre-existing
    /// inconsistency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown task,
    /// [`EngineError::Integrity`] when the task is a subtask, and
    /// [`EngineError::TransientStore`] on store failure; the operation is
    /// safe to re-invoke with the same target after a transient failure.
    pub async fn move_task(
        &self,
        task_id: TaskId,
        target_status: StatusId,
        target_position: u32,
    ) -> EngineResult<()> {
        let (task, _guards) = self.lock_task_columns(task_id, target_status).await?;
        if !task.is_root() {
            return Err(IntegrityViolation::NotRootTask(task_id).into());
        }

        let batch = self
            .build_move_batch(&task, target_status, target_position)
            .await?;
        if !batch.is_empty() {
            self.store.apply(&batch).await?;
        }
        Ok(())
    }

    /// Builds the position writes for moving a root task.
    ///
    /// Callers must hold the locks for both the task's current column and
    /// the target column; the batch is staged from reads taken under them.
    pub(crate) async fn build_move_batch(
        &self,
        task: &Task,
        target_status: StatusId,
        target_position: u32,
    ) -> EngineResult<Vec<TaskWrite>> {
        let source = task.status_id();
        let timestamp = self.clock.utc();
        let mut batch = Vec::new();

        if source == target_status {
            let rows = self.store.list_column(source).await?;
            let mut order = column_order_of(&rows);
            order.remove(task.id());
            order.insert_at(target_position, task.id());
            position_writes(&mut batch, &order, source, timestamp);
        } else {
            let source_rows = self.store.list_column(source).await?;
            let target_rows = self.store.list_column(target_status).await?;

            let mut source_order = column_order_of(&source_rows);
            source_order.remove(task.id());
            let mut target_order = column_order_of(&target_rows);
            target_order.insert_at(target_position, task.id());

            position_writes(&mut batch, &source_order, source, timestamp);
            position_writes(&mut batch, &target_order, target_status, timestamp);
        }
        Ok(batch)
    }

    /// Deletes a task, renumbering its column when it was a root task.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Integrity`] while the task still has direct
    /// children and [`EngineError::NotFound`] for an unknown task.
    pub async fn delete_task(&self, task_id: TaskId) -> EngineResult<()> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::NotFound(task_id))?;
        if !self.store.children_of(task_id).await?.is_empty() {
            return Err(IntegrityViolation::HasChildren(task_id).into());
        }
        if !task.is_root() {
            self.store.delete(task_id).await?;
            return Ok(());
        }

        let status_id = task.status_id();
        let _guard = self.locks.acquire(status_id.into_inner()).await;
        self.store.delete(task_id).await?;
        self.reconcile_locked(status_id).await?;
        Ok(())
    }

    /// Restores the contiguous `0..n-1` numbering of a column.
    ///
    /// Writes only the rows whose stored position differs from the computed
    /// one; re-running on an already-consistent column performs zero writes.
    /// Returns the number of corrected rows.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TransientStore`] on store failure.
    pub async fn reconcile_column(&self, status_id: StatusId) -> EngineResult<usize> {
        let _guard = self.locks.acquire(status_id.into_inner()).await;
        self.reconcile_locked(status_id).await
    }

    pub(crate) async fn reconcile_locked(&self, status_id: StatusId) -> EngineResult<usize> {
        let rows = self.store.list_column(status_id).await?;
        let order = column_order_of(&rows);
        let mut batch = Vec::new();
        position_writes(&mut batch, &order, status_id, self.clock.utc());
        let corrected = batch.len();
        if !batch.is_empty() {
            self.store.apply(&batch).await?;
        }
        Ok(corrected)
    }

    /// Resolves the task and locks its current column together with the
    /// target column.
    ///
    /// The task may move between the unlocked read and the lock acquisition,
    /// so the read is repeated under the lock until the locked column matches
    /// the task's column.
    pub(crate) async fn lock_task_columns(
        &self,
        task_id: TaskId,
        target_status: StatusId,
    ) -> EngineResult<(Task, ColumnGuards)> {
        let mut task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::NotFound(task_id))?;
        loop {
            let source = task.status_id();
            let guards = self
                .locks
                .acquire_pair(source.into_inner(), target_status.into_inner())
                .await;
            let current = self
                .store
                .find_by_id(task_id)
                .await?
                .ok_or(EngineError::NotFound(task_id))?;
            if current.status_id() == source {
                return Ok((current, guards));
            }
            drop(guards);
            task = current;
        }
    }
}

/// Guards held for the column pair of a move.
pub(crate) type ColumnGuards = (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>);

/// Turns a column diff into position writes for the batch.
fn position_writes(
    batch: &mut Vec<TaskWrite>,
    order: &ColumnOrder,
    column: StatusId,
    updated_at: DateTime<Utc>,
) {
    for change in order.changes() {
        batch.push(TaskWrite::Position {
            task_id: change.task_id,
            status_id: column,
            position: change.position,
            updated_at,
        });
    }
}

/// Builds the in-memory ordering value from a column's fetched rows.
fn column_order_of(rows: &[Task]) -> ColumnOrder {
    ColumnOrder::from_rows(rows.iter().map(|task| ColumnRow {
        task_id: task.id(),
        stored_position: task.order_in_status(),
    }))
}
