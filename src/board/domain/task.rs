//! Task aggregate root for board placement, company assignment, and
//! scheduling.

use super::{BoardDomainError, CompanyId, Schedule, StatusId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// A task with no parent is a *root task* and occupies a position in the
/// ordered column identified by its status. Subtasks carry no column
/// position; their `order_in_status` is always `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    parent_id: Option<TaskId>,
    status_id: StatusId,
    company_id: Option<CompanyId>,
    order_in_status: Option<u32>,
    schedule: Schedule,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted parent reference, if any.
    pub parent_id: Option<TaskId>,
    /// Persisted status (column) reference.
    pub status_id: StatusId,
    /// Persisted company reference, if any.
    pub company_id: Option<CompanyId>,
    /// Persisted column position, if any.
    pub order_in_status: Option<u32>,
    /// Persisted schedule window.
    pub schedule: Schedule,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field-scoped write against one task row.
///
/// The engine's services never persist whole aggregates: each mutation class
/// touches only the fields it owns, so interleaved batches from different
/// services cannot overwrite each other's committed state. A placement batch
/// writes positions, a cascade writes companies, and a progress update
/// writes status and schedule together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskWrite {
    /// Places a root task in a column at a concrete position.
    Position {
        /// Target task.
        task_id: TaskId,
        /// Column the task is placed in.
        status_id: StatusId,
        /// Contiguous position within the column.
        position: u32,
        /// Mutation timestamp.
        updated_at: DateTime<Utc>,
    },
    /// Reassigns the task to a company.
    Company {
        /// Target task.
        task_id: TaskId,
        /// Company the task is assigned to.
        company_id: CompanyId,
        /// Mutation timestamp.
        updated_at: DateTime<Utc>,
    },
    /// Sets the task's status and schedule window together.
    StatusAndSchedule {
        /// Target task.
        task_id: TaskId,
        /// Status the task moves to.
        status_id: StatusId,
        /// Schedule window to store.
        schedule: Schedule,
        /// Mutation timestamp.
        updated_at: DateTime<Utc>,
    },
}

impl TaskWrite {
    /// Returns the task this write targets.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match *self {
            Self::Position { task_id, .. }
            | Self::Company { task_id, .. }
            | Self::StatusAndSchedule { task_id, .. } => task_id,
        }
    }
}

impl Task {
    /// Creates a new root task appended to a column at the given position.
    #[must_use]
    pub fn new_root(
        status_id: StatusId,
        position: u32,
        company_id: Option<CompanyId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            parent_id: None,
            status_id,
            company_id,
            order_in_status: Some(position),
            schedule: Schedule::unscheduled(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a new subtask under the given parent.
    ///
    /// Subtasks inherit the parent's company and carry no column position.
    #[must_use]
    pub fn new_subtask(parent: &Self, status_id: StatusId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            parent_id: Some(parent.id),
            status_id,
            company_id: parent.company_id,
            order_in_status: None,
            schedule: Schedule::unscheduled(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            parent_id: data.parent_id,
            status_id: data.status_id,
            company_id: data.company_id,
            order_in_status: data.order_in_status,
            schedule: data.schedule,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent task identifier, if any.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns `true` when the task has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns the status (column) reference.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the company reference, if any.
    #[must_use]
    pub const fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    /// Returns the column position, if any.
    ///
    /// Only meaningful for root tasks; subtasks always return `None`.
    #[must_use]
    pub const fn order_in_status(&self) -> Option<u32> {
        self.order_in_status
    }

    /// Returns the schedule window.
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns the task to a company.
    pub fn assign_company(&mut self, company_id: CompanyId, clock: &impl Clock) {
        self.company_id = Some(company_id);
        self.touch(clock);
    }

    /// Replaces the schedule window.
    pub fn set_schedule(&mut self, schedule: Schedule, clock: &impl Clock) {
        self.schedule = schedule;
        self.touch(clock);
    }

    /// Applies a field-scoped write to the aggregate.
    ///
    /// Fields outside the write's scope are left untouched, so writes staged
    /// from a stale snapshot cannot revert another mutation class.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::SubtaskNotOrderable`] for a position write
    /// targeting a subtask.
    pub fn apply_write(&mut self, write: &TaskWrite) -> Result<(), BoardDomainError> {
        match *write {
            TaskWrite::Position {
                status_id,
                position,
                updated_at,
                ..
            } => {
                if self.parent_id.is_some() {
                    return Err(BoardDomainError::SubtaskNotOrderable(self.id));
                }
                self.status_id = status_id;
                self.order_in_status = Some(position);
                self.updated_at = updated_at;
            }
            TaskWrite::Company {
                company_id,
                updated_at,
                ..
            } => {
                self.company_id = Some(company_id);
                self.updated_at = updated_at;
            }
            TaskWrite::StatusAndSchedule {
                status_id,
                schedule,
                updated_at,
                ..
            } => {
                self.status_id = status_id;
                self.schedule = schedule;
                self.updated_at = updated_at;
            }
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
