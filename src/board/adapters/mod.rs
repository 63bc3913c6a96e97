//! Persistence adapters for the board engine.
//!
//! Concrete implementations of the [`TaskStore`] port, following hexagonal
//! architecture principles. Adapters handle all infrastructure concerns
//! while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryTaskStore`]: Thread-safe in-memory storage for unit
//!   testing
//! - [`postgres::PostgresTaskStore`]: Production-grade `PostgreSQL`
//!   persistence using Diesel ORM
//!
//! [`TaskStore`]: crate::board::ports::repository::TaskStore

pub mod memory;
pub mod postgres;
