//! In-memory adapter implementation for testing.
//!
//! Provides a simple, thread-safe task store suitable for exercising the
//! engine without database dependencies.

mod store;

pub use store::InMemoryTaskStore;
