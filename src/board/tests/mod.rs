//! Unit and service tests for the board engine.
