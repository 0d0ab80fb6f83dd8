//! Scoring and aggregation

pub mod metrics;
pub mod scoring;

pub use metrics::{BenchmarkReport, Evaluator, IterationResult, LineOutcome, ScoreSpread};
pub use scoring::{levenshtein, score_line, LineScore, ScorePolicy};
