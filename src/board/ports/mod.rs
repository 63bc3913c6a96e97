//! Port contracts for the board engine.

pub mod repository;

pub use repository::{TaskStore, TaskStoreError, TaskStoreResult};
