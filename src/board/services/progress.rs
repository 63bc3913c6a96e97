//! Gantt-driven progress updates: schedule validation and progress-to-status
//! application.

use crate::board::{
    domain::{Pipeline, Progress, Schedule, StatusId, Task, TaskId, TaskWrite},
    ports::TaskStore,
    services::{
        error::{EngineError, EngineResult},
        placement::PlacementService,
    },
};
use chrono::NaiveDate;
use mockable::Clock;

/// Progress application service.
///
/// Wraps the placement service so that a progress-driven status change on a
/// root task flows through the same column renumbering, and under the same
/// column locks, as a drag-and-drop move. Schedule and status land in the
/// same atomic batch as the renumbering, so a transient failure leaves the
/// task fully unchanged rather than half-updated.
#[derive(Clone)]
pub struct ProgressService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    placement: PlacementService<S, C>,
}

impl<S, C> ProgressService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new progress service sharing the placement service's store
    /// and column locks.
    #[must_use]
    pub const fn new(placement: PlacementService<S, C>) -> Self {
        Self { placement }
    }

    /// Updates a task's schedule window.
    ///
    /// Root tasks are updated under their column lock so the status written
    /// alongside the schedule cannot revert a concurrently committed move;
    /// subtasks are serialised per task.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRange`] when the due date precedes the
    /// start date (rejected before any read or write) and
    /// [`EngineError::NotFound`] for an unknown task.
    pub async fn update_schedule(
        &self,
        task_id: TaskId,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
    ) -> EngineResult<()> {
        let schedule = Schedule::new(start_date, due_date)?;
        let task = self.find_task(task_id).await?;

        if task.is_root() {
            let (current, _guards) = self
                .placement
                .lock_task_columns(task_id, task.status_id())
                .await?;
            self.persist_schedule(&current, schedule).await
        } else {
            let _guard = self
                .placement
                .locks()
                .acquire(task_id.into_inner())
                .await;
            let current = self.find_task(task_id).await?;
            self.persist_schedule(&current, schedule).await
        }
    }

    /// Applies a progress percentage to a task: validates the schedule, maps
    /// the progress to a pipeline status, and persists both.
    ///
    /// A root task whose status changes is appended to the end of the mapped
    /// column; the renumbering of both columns and the schedule update form
    /// one atomic batch staged under both column locks. A subtask only
    /// changes status, serialised per task. Returns the selected status.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRange`] when the due date precedes the
    /// start date (no write is performed), [`EngineError::NotFound`] for an
    /// unknown task, and [`EngineError::TransientStore`] on store failure.
    pub async fn apply_progress(
        &self,
        task_id: TaskId,
        progress: Progress,
        pipeline: &Pipeline,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
    ) -> EngineResult<StatusId> {
        let schedule = Schedule::new(start_date, due_date)?;
        let target = pipeline.status_for(progress);
        let task = self.find_task(task_id).await?;

        if task.is_root() {
            let (current, _guards) =
                self.placement.lock_task_columns(task_id, target).await?;
            if current.status_id() == target {
                self.persist_schedule(&current, schedule).await?;
                return Ok(target);
            }

            let mut batch = self
                .placement
                .build_move_batch(&current, target, u32::MAX)
                .await?;
            if current.schedule() != schedule {
                batch.push(self.schedule_write(&current, target, schedule));
            }
            self.placement.store().apply(&batch).await?;
            return Ok(target);
        }

        let _guard = self
            .placement
            .locks()
            .acquire(task_id.into_inner())
            .await;
        let current = self.find_task(task_id).await?;
        if current.status_id() == target {
            self.persist_schedule(&current, schedule).await?;
        } else {
            let write = self.schedule_write(&current, target, schedule);
            self.placement.store().apply(&[write]).await?;
        }
        Ok(target)
    }

    /// Writes the schedule when it differs from the task's stored window.
    async fn persist_schedule(&self, current: &Task, schedule: Schedule) -> EngineResult<()> {
        if current.schedule() == schedule {
            return Ok(());
        }
        let write = self.schedule_write(current, current.status_id(), schedule);
        self.placement.store().apply(&[write]).await?;
        Ok(())
    }

    fn schedule_write(&self, current: &Task, status_id: StatusId, schedule: Schedule) -> TaskWrite {
        TaskWrite::StatusAndSchedule {
            task_id: current.id(),
            status_id,
            schedule,
            updated_at: self.placement.clock().utc(),
        }
    }

    async fn find_task(&self, task_id: TaskId) -> EngineResult<Task> {
        self.placement
            .store()
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::NotFound(task_id))
    }
}
