//! Results reporting
//!
//! Console breakdowns and the per-run JSON summary. All mismatch diffs are
//! rendered here from the recorded outcomes; the scoring engine itself never
//! prints.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::{BenchmarkReport, IterationResult, ScoreSpread};

/// JSON summary export for one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub model: String,
    pub questions: usize,
    pub iterations: Vec<IterationSummary>,
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<ScoreSpread>,
}

/// Per-iteration entry in the JSON summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationSummary {
    pub iteration: usize,
    pub average: f64,
    pub exact_count: usize,
}

impl JsonSummary {
    /// Create from an aggregated benchmark report
    pub fn from_report(
        run_id: impl Into<String>,
        model: impl Into<String>,
        report: &BenchmarkReport,
    ) -> Self {
        let iterations = report
            .iterations
            .iter()
            .enumerate()
            .map(|(i, it)| IterationSummary {
                iteration: i + 1,
                average: it.average,
                exact_count: it.exact_count,
            })
            .collect();

        let questions = report
            .iterations
            .first()
            .map(|it| it.outcomes.len())
            .unwrap_or(0);

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: model.into(),
            questions,
            iterations,
            average_score: report.average_score,
            spread: report.spread,
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Print the per-line breakdown for one iteration, with mismatch diffs
pub fn print_iteration_report(iteration: usize, result: &IterationResult) {
    print_scored_lines(&format!("--- Iteration {} ---", iteration), result);
}

/// Print the per-line breakdown under a custom heading (batch scoring)
pub fn print_scored_lines(heading: &str, result: &IterationResult) {
    println!("\n{}", heading);

    for outcome in &result.outcomes {
        println!(
            "{}: {:.2}% - '{}' vs '{}'",
            outcome.label, outcome.score.value, outcome.candidate, outcome.gold
        );
        if !outcome.score.exact {
            println!("  - {}", outcome.gold);
            println!("  + {}", outcome.candidate);
        }
    }

    println!(
        "Average: {:.2}%, exact: {}/{}",
        result.average,
        result.exact_count,
        result.outcomes.len()
    );
}

/// Print the final benchmark summary
pub fn print_benchmark_report(model: &str, report: &BenchmarkReport) {
    println!("\n=== Benchmark Results ===\n");
    println!("Model: {}", model);
    println!("{:-<50}", "");

    for (i, it) in report.iterations.iter().enumerate() {
        println!(
            "  Iteration {}: {:.2}% ({}/{} exact)",
            i + 1,
            it.average,
            it.exact_count,
            it.outcomes.len()
        );
    }

    println!("{:-<50}", "");
    println!("Final Score: {:.2}%", report.average_score);

    if let Some(spread) = &report.spread {
        println!(
            "Best: {:.2}%  Worst: {:.2}%  Range: {:.2}",
            spread.best, spread.worst, spread.range
        );
    }

    println!("{:=<50}", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BenchmarkReport;

    fn iteration(average: f64, exact_count: usize) -> IterationResult {
        IterationResult {
            outcomes: Vec::new(),
            average,
            exact_count,
        }
    }

    #[test]
    fn test_summary_from_report() {
        let report = BenchmarkReport::aggregate(vec![iteration(80.0, 10), iteration(90.0, 12)]);
        let summary = JsonSummary::from_report("20260823-120000", "test-model", &report);

        assert_eq!(summary.iterations.len(), 2);
        assert_eq!(summary.iterations[1].iteration, 2);
        assert_eq!(summary.average_score, 85.0);
        assert!(summary.spread.is_some());
    }

    #[test]
    fn test_single_iteration_summary_omits_spread() {
        let report = BenchmarkReport::aggregate(vec![iteration(75.0, 9)]);
        let summary = JsonSummary::from_report("run", "m", &report);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("spread"));
        assert!(json.contains("\"average_score\":75.0"));
    }

    #[test]
    fn test_summary_round_trip() {
        let report = BenchmarkReport::aggregate(vec![iteration(60.0, 5), iteration(70.0, 6)]);
        let summary = JsonSummary::from_report("run", "m", &report);

        let json = serde_json::to_string_pretty(&summary).unwrap();
        let parsed: JsonSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.average_score, 65.0);
        assert_eq!(parsed.iterations[0].exact_count, 5);
    }
}
