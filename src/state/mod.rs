//! Per-query execution state
//!
//! This module holds the context object every resolver of a query receives:
//! the current base URL, the last visited URL, the current document, and the
//! fetch queue with its transport options.

mod execution;

pub use execution::ExecutionState;
