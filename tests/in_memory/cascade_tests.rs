//! In-memory integration tests for company reassignment cascades.

use std::sync::Arc;

use gantry::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{CompanyId, StatusId, Task, TaskId},
    ports::TaskStore,
    services::CreateTaskRequest,
};
use rstest::rstest;

use super::helpers::{cascade, placement, store, TestPlacement};

/// Builds a root task with two children and one grandchild under each child,
/// returning all five ids, root first.
async fn create_tree(placement_service: &TestPlacement, status: StatusId) -> Vec<TaskId> {
    let root = placement_service
        .create_task(CreateTaskRequest::root(status))
        .await
        .expect("create root");
    let mut ids = vec![root.id()];
    for _ in 0..2 {
        let child = placement_service
            .create_task(CreateTaskRequest::subtask_of(root.id(), status))
            .await
            .expect("create child");
        let grandchild = placement_service
            .create_task(CreateTaskRequest::subtask_of(child.id(), status))
            .await
            .expect("create grandchild");
        ids.push(child.id());
        ids.push(grandchild.id());
    }
    ids
}

async fn company_of(store: &InMemoryTaskStore, id: TaskId) -> Option<CompanyId> {
    store
        .find_by_id(id)
        .await
        .expect("lookup should succeed")
        .as_ref()
        .and_then(Task::company_id)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_cascades_to_grandchildren(store: Arc<InMemoryTaskStore>) {
    let placement_service = placement(&store);
    let cascade_service = cascade(&store);
    let status = StatusId::new();
    let tree = create_tree(&placement_service, status).await;
    let company = CompanyId::new();

    cascade_service
        .reassign_company(tree[0], company)
        .await
        .expect("cascade should succeed");

    for id in &tree {
        assert_eq!(company_of(&store, *id).await, Some(company));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_cascades_on_disjoint_trees_both_complete(store: Arc<InMemoryTaskStore>) {
    let placement_service = placement(&store);
    let cascade_service = cascade(&store);
    let status = StatusId::new();
    let first_tree = create_tree(&placement_service, status).await;
    let second_tree = create_tree(&placement_service, status).await;
    let first_company = CompanyId::new();
    let second_company = CompanyId::new();

    let (first, second) = tokio::join!(
        cascade_service.reassign_company(first_tree[0], first_company),
        cascade_service.reassign_company(second_tree[0], second_company),
    );
    first.expect("first cascade should succeed");
    second.expect("second cascade should succeed");

    for id in &first_tree {
        assert_eq!(company_of(&store, *id).await, Some(first_company));
    }
    for id in &second_tree {
        assert_eq!(company_of(&store, *id).await, Some(second_company));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cascade_overwrites_divergent_subtask_companies(store: Arc<InMemoryTaskStore>) {
    let placement_service = placement(&store);
    let cascade_service = cascade(&store);
    let status = StatusId::new();
    let root = placement_service
        .create_task(CreateTaskRequest::root(status).with_company(CompanyId::new()))
        .await
        .expect("create root");
    let stray = placement_service
        .create_task(
            CreateTaskRequest::subtask_of(root.id(), status).with_company(CompanyId::new()),
        )
        .await
        .expect("create stray subtask");

    let company = CompanyId::new();
    cascade_service
        .reassign_company(root.id(), company)
        .await
        .expect("cascade should succeed");

    assert_eq!(company_of(&store, root.id()).await, Some(company));
    assert_eq!(company_of(&store, stray.id()).await, Some(company));
}
