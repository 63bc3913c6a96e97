//! In-memory integration tests for Gantt-driven progress updates.

use std::sync::Arc;

use chrono::NaiveDate;
use gantry::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{Pipeline, PipelineStep, Progress, StatusId},
    ports::TaskStore,
    services::EngineError,
};
use rstest::rstest;

use super::helpers::{column_ids, create_column, ensure_contiguous, placement, progress, store};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gantt_session_walks_a_task_across_the_board(
    store: Arc<InMemoryTaskStore>,
) -> Result<(), eyre::Report> {
    let placement_service = placement(&store);
    let progress_service = progress(&store);
    let todo = StatusId::new();
    let doing = StatusId::new();
    let done = StatusId::new();
    let pipeline = Pipeline::new([
        PipelineStep::new(todo, 0),
        PipelineStep::new(doing, 5),
        PipelineStep::new(done, 10),
    ])
    .expect("valid pipeline");
    let seeded = create_column(&placement_service, todo, 2).await;
    let tracked = seeded[0].id();
    let start = date(2025, 3, 1);
    let due = date(2025, 3, 31);

    for (percent, expected_column) in [(0u8, todo), (55, doing), (100, done)] {
        let selected = progress_service
            .apply_progress(
                tracked,
                Progress::new(percent).expect("valid progress"),
                &pipeline,
                Some(start),
                Some(due),
            )
            .await
            .expect("progress should apply");
        assert_eq!(selected, expected_column);
        assert!(column_ids(&store, expected_column).await.contains(&tracked));
        for column in [todo, doing, done] {
            ensure_contiguous(&store, column).await?;
        }
    }

    let task = store
        .find_by_id(tracked)
        .await
        .expect("lookup should succeed")
        .expect("task exists");
    assert_eq!(task.schedule().start_date(), Some(start));
    assert_eq!(task.schedule().due_date(), Some(due));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_date_range_leaves_the_board_untouched(store: Arc<InMemoryTaskStore>) {
    let placement_service = placement(&store);
    let progress_service = progress(&store);
    let todo = StatusId::new();
    let done = StatusId::new();
    let pipeline = Pipeline::new([
        PipelineStep::new(todo, 0),
        PipelineStep::new(done, 1),
    ])
    .expect("valid pipeline");
    let seeded = create_column(&placement_service, todo, 1).await;

    let result = progress_service
        .apply_progress(
            seeded[0].id(),
            Progress::COMPLETE,
            &pipeline,
            Some(date(2025, 3, 10)),
            Some(date(2025, 3, 1)),
        )
        .await;

    assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
    assert_eq!(column_ids(&store, todo).await, vec![seeded[0].id()]);
    assert!(column_ids(&store, done).await.is_empty());
}
