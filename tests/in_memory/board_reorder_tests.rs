//! In-memory integration tests for drag-and-drop reordering flows.

use std::sync::Arc;

use gantry::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{StatusId, TaskId},
};
use rstest::rstest;

use super::helpers::{column_ids, create_column, ensure_contiguous, placement, store};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_session_of_moves_keeps_every_column_contiguous(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let placement_service = placement(&store);
    let todo = StatusId::new();
    let doing = StatusId::new();
    let done = StatusId::new();
    let todo_tasks = create_column(&placement_service, todo, 4).await;
    let doing_tasks = create_column(&placement_service, doing, 2).await;

    // A realistic drag-and-drop session across three columns.
    let moves = [
        (todo_tasks[3].id(), todo, 0),
        (todo_tasks[0].id(), doing, 1),
        (doing_tasks[1].id(), done, 0),
        (todo_tasks[0].id(), done, 0),
        (doing_tasks[0].id(), doing, 0),
    ];
    for (task_id, target, target_position) in moves {
        placement_service
            .move_task(task_id, target, target_position)
            .await
            .expect("move should succeed");
        for column in [todo, doing, done] {
            ensure_contiguous(&store, column).await?;
        }
    }

    assert_eq!(store.task_count().expect("count"), 6);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moved_task_lands_exactly_where_it_was_dropped(store: Arc<InMemoryTaskStore>) {
    let placement_service = placement(&store);
    let todo = StatusId::new();
    let seeded = create_column(&placement_service, todo, 3).await;

    placement_service
        .move_task(seeded[2].id(), todo, 0)
        .await
        .expect("move should succeed");

    let expected: Vec<TaskId> = vec![seeded[2].id(), seeded[0].id(), seeded[1].id()];
    assert_eq!(column_ids(&store, todo).await, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_moves_on_disjoint_columns_both_succeed(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let placement_service = placement(&store);
    let left = StatusId::new();
    let right = StatusId::new();
    let left_tasks = create_column(&placement_service, left, 3).await;
    let right_tasks = create_column(&placement_service, right, 3).await;

    let (first, second) = tokio::join!(
        placement_service.move_task(left_tasks[2].id(), left, 0),
        placement_service.move_task(right_tasks[0].id(), right, 2),
    );
    first.expect("left move should succeed");
    second.expect("right move should succeed");

    ensure_contiguous(&store, left).await?;
    ensure_contiguous(&store, right).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_moves_into_the_same_column_serialise(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let placement_service = placement(&store);
    let todo = StatusId::new();
    let doing = StatusId::new();
    let todo_tasks = create_column(&placement_service, todo, 2).await;
    let doing_tasks = create_column(&placement_service, doing, 2).await;

    let (first, second) = tokio::join!(
        placement_service.move_task(todo_tasks[0].id(), doing, 0),
        placement_service.move_task(doing_tasks[1].id(), todo, 0),
    );
    first.expect("first move should succeed");
    second.expect("second move should succeed");

    ensure_contiguous(&store, todo).await?;
    ensure_contiguous(&store, doing).await?;
    assert_eq!(store.task_count().expect("count"), 4);
    Ok(())
}
