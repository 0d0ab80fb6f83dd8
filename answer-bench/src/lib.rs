//! Answer accuracy benchmark for OpenAI-compatible local LLM endpoints
//!
//! Sends a prompt containing a fixed question set to a model, extracts the
//! `Q<n>:` answer lines from the response, and scores each against a gold
//! set of expected answers using normalized Levenshtein similarity with a
//! mismatch penalty. Repeated iterations are aggregated into a final score
//! with best/worst spread.
//!
//! # Example
//!
//! ```
//! use answer_bench::analysis::{Evaluator, ScorePolicy};
//! use answer_bench::extract::extract_labeled;
//! use answer_bench::gold::GoldSet;
//!
//! let gold = GoldSet::parse("Q1: Yes\nQ2: 42\n").unwrap();
//! let evaluator = Evaluator::new(gold, ScorePolicy::default());
//!
//! let response = "Sure, here are my answers:\nQ1: Yes\nQ2: 42\n";
//! let extraction = extract_labeled(response, evaluator.expected());
//! let result = evaluator.evaluate(&extraction.candidates);
//!
//! assert_eq!(result.average, 100.0);
//! assert_eq!(result.exact_count, 2);
//! ```

pub mod analysis;
pub mod config;
pub mod extract;
pub mod gold;
pub mod providers;
pub mod reporting;
pub mod runner;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        BenchmarkReport, Evaluator, IterationResult, LineOutcome, LineScore, ScorePolicy,
        ScoreSpread,
    };
    pub use crate::config::Config;
    pub use crate::extract::{extract_labeled, extract_positional, CandidateLine, Extraction};
    pub use crate::gold::{GoldError, GoldLine, GoldSet};
    pub use crate::providers::{
        CompletionRequest, CompletionResponse, LLMProvider, LmStudioClient, Message, ModelInfo,
        ProviderError, ProviderResult,
    };
    pub use crate::reporting::{
        print_benchmark_report, print_iteration_report, print_scored_lines, JsonSummary,
    };
    pub use crate::runner::{Executor, ExecutorConfig};
}
