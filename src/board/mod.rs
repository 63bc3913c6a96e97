//! Task position and hierarchy consistency engine.
//!
//! This module keeps three board invariants intact across mutations:
//! a gap-free, duplicate-free position index for the root tasks of each
//! status column, company assignment propagated through a task's subtask
//! tree, and a discrete pipeline status derived from continuous completion
//! progress. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
