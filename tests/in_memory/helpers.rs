//! Shared test helpers for in-memory board engine integration tests.

use gantry::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{StatusId, Task, TaskId},
    ports::TaskStore,
    services::{CascadeService, CreateTaskRequest, PlacementService, ProgressService},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Placement service type used across the integration tests.
pub type TestPlacement = PlacementService<InMemoryTaskStore, DefaultClock>;
/// Cascade service type used across the integration tests.
pub type TestCascade = CascadeService<InMemoryTaskStore, DefaultClock>;
/// Progress service type used across the integration tests.
pub type TestProgress = ProgressService<InMemoryTaskStore, DefaultClock>;

/// Provides a fresh in-memory store for each test.
#[fixture]
pub fn store() -> Arc<InMemoryTaskStore> {
    Arc::new(InMemoryTaskStore::new())
}

/// Builds a placement service over the shared store.
pub fn placement(store: &Arc<InMemoryTaskStore>) -> TestPlacement {
    PlacementService::new(Arc::clone(store), Arc::new(DefaultClock))
}

/// Builds a cascade service over the shared store.
pub fn cascade(store: &Arc<InMemoryTaskStore>) -> TestCascade {
    CascadeService::new(Arc::clone(store), Arc::new(DefaultClock))
}

/// Builds a progress service over the shared store.
pub fn progress(store: &Arc<InMemoryTaskStore>) -> TestProgress {
    ProgressService::new(placement(store))
}

/// Creates `count` root tasks in a column through the public API and returns
/// them in creation (and therefore position) order.
pub async fn create_column(
    placement: &TestPlacement,
    status_id: StatusId,
    count: usize,
) -> Vec<Task> {
    let mut created = Vec::with_capacity(count);
    for _ in 0..count {
        let task = placement
            .create_task(CreateTaskRequest::root(status_id))
            .await
            .expect("task creation should succeed");
        created.push(task);
    }
    created
}

/// Returns the column's task ids in stored-position order.
pub async fn column_ids(store: &InMemoryTaskStore, status_id: StatusId) -> Vec<TaskId> {
    store
        .list_column(status_id)
        .await
        .expect("column listing should succeed")
        .iter()
        .map(Task::id)
        .collect()
}

/// Verifies a column's stored positions are exactly `0..n-1`.
///
/// # Errors
///
/// Returns an error when a position is missing, duplicated, or out of
/// sequence.
pub async fn ensure_contiguous(
    store: &InMemoryTaskStore,
    status_id: StatusId,
) -> Result<(), eyre::Report> {
    let column = store
        .list_column(status_id)
        .await
        .map_err(|err| eyre::eyre!("column listing failed: {err}"))?;
    for (index, task) in column.iter().enumerate() {
        let expected = u32::try_from(index)?;
        eyre::ensure!(
            task.order_in_status() == Some(expected),
            "task {} stored position {:?}, expected {}",
            task.id(),
            task.order_in_status(),
            expected
        );
    }
    Ok(())
}
