//! Company reassignment cascading over a task's subtask tree.

use crate::board::{
    domain::{CompanyId, Task, TaskId, TaskWrite},
    ports::TaskStore,
    services::{
        error::{EngineError, EngineResult, IntegrityViolation},
        locks::LockRegistry,
    },
};
use mockable::Clock;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Company cascade orchestration service.
///
/// Cascades over the same root task are serialised through an internal lock
/// registry; cascades over disjoint subtrees run in parallel.
#[derive(Clone)]
pub struct CascadeService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    locks: Arc<LockRegistry>,
}

impl<S, C> CascadeService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new cascade service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            locks: Arc::new(LockRegistry::new()),
        }
    }

    /// Reassigns a root task and every transitive descendant to a company.
    ///
    /// A no-op when the task is a subtask or already belongs to the company,
    /// which also makes a retried cascade converge. The traversal is an
    /// explicit worklist with a visited-set guard rather than recursion, so
    /// tree depth is unbounded and a cycle in corrupt data is detected
    /// deterministically. All writes are collected during traversal and
    /// applied as one atomic batch afterwards: a detected cycle aborts
    /// before any write, leaving no partial cascade behind.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown task,
    /// [`EngineError::Integrity`] when the parent/child graph contains a
    /// cycle, and [`EngineError::TransientStore`] on store failure.
    pub async fn reassign_company(
        &self,
        task_id: TaskId,
        new_company: CompanyId,
    ) -> EngineResult<()> {
        let root = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::NotFound(task_id))?;
        if !root.is_root() || root.company_id() == Some(new_company) {
            return Ok(());
        }

        let _guard = self.locks.acquire(task_id.into_inner()).await;
        let locked_root = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::NotFound(task_id))?;
        if locked_root.company_id() == Some(new_company) {
            return Ok(());
        }

        let batch = self.collect_cascade(locked_root, new_company).await?;
        self.store.apply(&batch).await?;
        Ok(())
    }

    /// Walks the subtree breadth-first, producing the company writes.
    ///
    /// The writes touch only the company field, so a cascade staged from a
    /// snapshot cannot revert a column move committed while it traversed.
    async fn collect_cascade(
        &self,
        root: Task,
        new_company: CompanyId,
    ) -> EngineResult<Vec<TaskWrite>> {
        let timestamp = self.clock.utc();
        let mut visited: HashSet<TaskId> = HashSet::from([root.id()]);
        let mut queue: VecDeque<Task> = VecDeque::from([root]);
        let mut batch = Vec::new();

        while let Some(current) = queue.pop_front() {
            for child in self.store.children_of(current.id()).await? {
                if !visited.insert(child.id()) {
                    return Err(IntegrityViolation::CycleDetected(child.id()).into());
                }
                queue.push_back(child);
            }
            if current.company_id() != Some(new_company) {
                batch.push(TaskWrite::Company {
                    task_id: current.id(),
                    company_id: new_company,
                    updated_at: timestamp,
                });
            }
        }
        Ok(batch)
    }
}
