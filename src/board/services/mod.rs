//! Application services for the board consistency engine.
//!
//! Three independent operations share the task store: column placement
//! (`move_task` and friends), company cascading (`reassign_company`), and
//! progress application (`apply_progress`). They never call each other's
//! public surface except that progress updates delegate root-task status
//! changes to the placement service so column contiguity survives every
//! mutation path.

mod cascade;
mod error;
pub(crate) mod locks;
mod placement;
mod progress;

pub use cascade::CascadeService;
pub use error::{EngineError, EngineResult, IntegrityViolation};
pub use placement::{CreateTaskRequest, PlacementService};
pub use progress::ProgressService;
