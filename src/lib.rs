//! Gantry: board consistency engine for a multi-tenant task tracker.
//!
//! This crate implements the ordering, cascading, and progress-mapping core
//! behind a Kanban/Gantt project tracker. The surrounding application
//! (pages, authentication, API framing) talks to a relational store through
//! thin parameterised queries; the pieces with real invariants live here:
//!
//! - **Column placement**: a contiguous, zero-based position index over the
//!   root tasks of each status column, maintained across drag-and-drop
//!   moves, creation, and deletion, with a self-healing reconciliation pass.
//! - **Company cascade**: reassigning a root task's company propagates to
//!   every transitive subtask.
//! - **Progress mapping**: a 0-100 completion percentage maps onto the
//!   ordered steps of a pipeline to drive Gantt-originated status updates.
//!
//! # Architecture
//!
//! Gantry follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)

pub mod board;
