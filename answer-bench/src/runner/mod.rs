//! Benchmark execution engine

pub mod executor;

pub use executor::{Executor, ExecutorConfig};
