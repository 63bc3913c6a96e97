//! `PostgreSQL` task store implementation for the board engine.

use super::{
    models::{CompanyChangeset, NewTaskRow, PositionChangeset, StatusScheduleChangeset, TaskRow},
    schema::tasks,
};
use crate::board::{
    domain::{CompanyId, PersistedTaskData, Schedule, StatusId, Task, TaskId, TaskWrite},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: BoardPgPool,
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn apply(&self, writes: &[TaskWrite]) -> TaskStoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let batch = writes.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                for write in &batch {
                    let updated = execute_write(tx_conn, write)?;
                    if updated == 0 {
                        return Err(TaskStoreError::NotFound(write.task_id()));
                    }
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_column(&self, status_id: StatusId) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status_id.eq(status_id.into_inner()))
                .filter(tasks::parent_id.is_null())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            let mut column = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskStoreResult<Vec<Task>>>()?;
            // Position order with missing positions last, ties broken by id,
            // matching the contract of the port.
            column.sort_by_key(|task| {
                (
                    task.order_in_status().map_or(u64::MAX, u64::from),
                    task.id().into_inner(),
                )
            });
            Ok(column)
        })
        .await
    }

    async fn children_of(&self, parent_id: TaskId) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_id.eq(parent_id.into_inner()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if deleted == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn position_to_column(position: Option<u32>) -> TaskStoreResult<Option<i32>> {
    position
        .map(|value| i32::try_from(value).map_err(TaskStoreError::persistence))
        .transpose()
}

/// Runs one field-scoped write, returning the affected row count.
fn execute_write(connection: &mut PgConnection, write: &TaskWrite) -> TaskStoreResult<usize> {
    let target = tasks::table.filter(tasks::id.eq(write.task_id().into_inner()));
    let updated = match *write {
        TaskWrite::Position {
            status_id,
            position,
            updated_at,
            ..
        } => diesel::update(target)
            .set(PositionChangeset {
                status_id: status_id.into_inner(),
                order_in_status: i32::try_from(position).map_err(TaskStoreError::persistence)?,
                updated_at,
            })
            .execute(connection)?,
        TaskWrite::Company {
            company_id,
            updated_at,
            ..
        } => diesel::update(target)
            .set(CompanyChangeset {
                company_id: company_id.into_inner(),
                updated_at,
            })
            .execute(connection)?,
        TaskWrite::StatusAndSchedule {
            status_id,
            schedule,
            updated_at,
            ..
        } => diesel::update(target)
            .set(StatusScheduleChangeset {
                status_id: status_id.into_inner(),
                start_date: schedule.start_date(),
                due_date: schedule.due_date(),
                updated_at,
            })
            .execute(connection)?,
    };
    Ok(updated)
}

fn to_new_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        parent_id: task.parent_id().map(TaskId::into_inner),
        status_id: task.status_id().into_inner(),
        company_id: task.company_id().map(CompanyId::into_inner),
        order_in_status: position_to_column(task.order_in_status())?,
        start_date: task.schedule().start_date(),
        due_date: task.schedule().due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        parent_id,
        status_id,
        company_id,
        order_in_status,
        start_date,
        due_date,
        created_at,
        updated_at,
    } = row;

    let position = order_in_status
        .map(|value| u32::try_from(value).map_err(TaskStoreError::persistence))
        .transpose()?;
    let schedule = Schedule::new(start_date, due_date).map_err(TaskStoreError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        parent_id: parent_id.map(TaskId::from_uuid),
        status_id: StatusId::from_uuid(status_id),
        company_id: company_id.map(CompanyId::from_uuid),
        order_in_status: position,
        schedule,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
