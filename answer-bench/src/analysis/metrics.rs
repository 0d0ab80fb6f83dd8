//! Iteration and benchmark aggregation

use serde::{Deserialize, Serialize};

use super::scoring::{score_line, LineScore, ScorePolicy};
use crate::extract::CandidateLine;
use crate::gold::GoldSet;

/// One candidate/gold pairing with its score, kept for display and diffs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineOutcome {
    pub label: String,
    pub gold: String,
    pub candidate: String,
    pub score: LineScore,
}

/// Result of scoring a single benchmark iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationResult {
    pub outcomes: Vec<LineOutcome>,
    /// Arithmetic mean of the line scores
    pub average: f64,
    /// Lines that matched their gold line exactly
    pub exact_count: usize,
}

/// Scores candidate lines against an injected gold set.
///
/// The gold set is fixed at construction and already validated non-empty,
/// so per-iteration averages never divide by zero.
pub struct Evaluator {
    gold: GoldSet,
    policy: ScorePolicy,
}

impl Evaluator {
    pub fn new(gold: GoldSet, policy: ScorePolicy) -> Self {
        Self { gold, policy }
    }

    /// Number of candidate lines each iteration is expected to supply
    pub fn expected(&self) -> usize {
        self.gold.len()
    }

    /// Score one iteration's candidates positionally against the gold set.
    pub fn evaluate(&self, candidates: &[CandidateLine]) -> IterationResult {
        let outcomes: Vec<LineOutcome> = self
            .gold
            .lines()
            .iter()
            .zip(candidates)
            .map(|(gold, candidate)| {
                let gold_line = gold.line();
                let score = score_line(&candidate.text, &gold_line, &self.policy);
                LineOutcome {
                    label: gold.label.clone(),
                    gold: gold_line,
                    candidate: candidate.text.clone(),
                    score,
                }
            })
            .collect();

        let average =
            outcomes.iter().map(|o| o.score.value).sum::<f64>() / outcomes.len() as f64;
        let exact_count = outcomes.iter().filter(|o| o.score.exact).count();

        IterationResult {
            outcomes,
            average,
            exact_count,
        }
    }
}

/// Best/worst iteration statistics, only meaningful across repeated runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSpread {
    pub best: f64,
    pub worst: f64,
    pub range: f64,
}

/// Aggregate over all iterations of a benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub iterations: Vec<IterationResult>,
    /// Mean of the per-iteration averages
    pub average_score: f64,
    /// Present only when at least two iterations ran
    pub spread: Option<ScoreSpread>,
}

impl BenchmarkReport {
    pub fn aggregate(iterations: Vec<IterationResult>) -> Self {
        let average_score = if iterations.is_empty() {
            0.0
        } else {
            iterations.iter().map(|it| it.average).sum::<f64>() / iterations.len() as f64
        };

        let spread = if iterations.len() >= 2 {
            let best = iterations
                .iter()
                .map(|it| it.average)
                .fold(f64::NEG_INFINITY, f64::max);
            let worst = iterations
                .iter()
                .map(|it| it.average)
                .fold(f64::INFINITY, f64::min);
            Some(ScoreSpread {
                best,
                worst,
                range: best - worst,
            })
        } else {
            None
        };

        Self {
            iterations,
            average_score,
            spread,
        }
    }
}
