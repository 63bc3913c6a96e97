//! Domain model for the board consistency engine.
//!
//! Pure types with no infrastructure dependencies: task aggregate, column
//! ordering value object, pipeline step sequence, and schedule window.

mod column;
mod error;
mod ids;
mod pipeline;
mod schedule;
mod task;

pub use column::{ColumnOrder, ColumnRow, PositionChange};
pub use error::BoardDomainError;
pub use ids::{CompanyId, StatusId, TaskId};
pub use pipeline::{Pipeline, PipelineStep, Progress};
pub use schedule::Schedule;
pub use task::{PersistedTaskData, Task, TaskWrite};
