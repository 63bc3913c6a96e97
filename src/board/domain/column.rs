//! Explicit ordering state for one board column.
//!
//! A column's ordering is stored row-by-row as `order_in_status` values and
//! is therefore an emergent property of many rows. [`ColumnOrder`] makes it a
//! first-class value: it is rebuilt from the stored rows at the start of a
//! placement operation, mutated in memory, and then diffed against the stored
//! positions so that only the rows whose position actually changed are
//! written back. The same diff doubles as the reconciliation pass: building
//! the value from rows with missing, duplicate, or gapped positions and
//! emitting its changes restores a contiguous `0..n-1` numbering.

use super::TaskId;
use std::collections::HashMap;

/// Stored position snapshot for one root task in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRow {
    /// Task identifier.
    pub task_id: TaskId,
    /// Position as currently stored, `None` when never assigned.
    pub stored_position: Option<u32>,
}

/// A position reassignment produced by diffing a [`ColumnOrder`] against the
/// stored rows it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionChange {
    /// Task whose stored position differs from the computed one.
    pub task_id: TaskId,
    /// Computed contiguous position.
    pub position: u32,
}

/// In-memory ordered position list for the root tasks of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder {
    ordered: Vec<TaskId>,
    stored: HashMap<TaskId, Option<u32>>,
}

impl ColumnOrder {
    /// Builds the ordering from stored rows.
    ///
    /// Rows are ranked by stored position ascending with missing positions
    /// last, then by task id as a deterministic tie-break for duplicate or
    /// missing positions.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = ColumnRow>) -> Self {
        let mut ranked: Vec<ColumnRow> = rows.into_iter().collect();
        ranked.sort_by_key(|row| (rank_of(row.stored_position), row.task_id.into_inner()));

        let mut stored = HashMap::with_capacity(ranked.len());
        let mut ordered = Vec::with_capacity(ranked.len());
        for row in ranked {
            stored.insert(row.task_id, row.stored_position);
            ordered.push(row.task_id);
        }
        Self { ordered, stored }
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns the computed position of a task, if present.
    #[must_use]
    pub fn position_of(&self, task_id: TaskId) -> Option<u32> {
        self.ordered
            .iter()
            .zip(0u32..)
            .find_map(|(id, position)| (*id == task_id).then_some(position))
    }

    /// Removes a task from the ordering.
    ///
    /// Returns `true` when the task was present. Tasks below it shift up,
    /// closing the gap.
    pub fn remove(&mut self, task_id: TaskId) -> bool {
        let before = self.ordered.len();
        self.ordered.retain(|id| *id != task_id);
        self.ordered.len() != before
    }

    /// Inserts a task at the given position, clamped to `[0, len]`.
    ///
    /// Tasks at or below the insertion point shift down, opening a slot. A
    /// task inserted this way has no stored position, so the diff always
    /// emits a change for it.
    pub fn insert_at(&mut self, position: u32, task_id: TaskId) {
        let index = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(self.ordered.len());
        self.ordered.insert(index, task_id);
        self.stored.entry(task_id).or_insert(None);
    }

    /// Diffs the computed contiguous numbering against the stored positions.
    ///
    /// Emits one [`PositionChange`] per task whose stored position differs
    /// from its index in the ordering. On a column whose stored positions are
    /// already contiguous and untouched, the diff is empty, which makes the
    /// reconciliation pass idempotent and a re-run free of writes.
    #[must_use]
    pub fn changes(&self) -> Vec<PositionChange> {
        self.ordered
            .iter()
            .zip(0u32..)
            .filter(|(id, position)| {
                self.stored.get(*id).copied().flatten() != Some(*position)
            })
            .map(|(id, position)| PositionChange {
                task_id: *id,
                position,
            })
            .collect()
    }
}

/// Maps a stored position to a sort rank that places missing positions last.
const fn rank_of(position: Option<u32>) -> u64 {
    match position {
        Some(value) => value as u64,
        None => u64::MAX,
    }
}
