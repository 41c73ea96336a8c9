//! Execution Integration
//!
//! Connects policies to order execution.

pub mod runner;

pub use runner::{PolicyRunner, RunnerStep};
