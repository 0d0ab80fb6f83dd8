//! Edit-distance similarity scoring
//!
//! Scores a candidate line against a gold line on a 0-100 scale derived from
//! Levenshtein distance, then applies a mismatch penalty: any line that is not
//! character-for-character identical has its score divided by the policy's
//! divisor. Scoring is pure; mismatch diagnostics are rendered elsewhere from
//! the returned data.

use serde::{Deserialize, Serialize};

/// Penalty policy for imperfect matches
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScorePolicy {
    /// Divisor applied to any score below 100. The default of 2.0 halves
    /// near-miss scores so fuzzy credit stays well below an exact match.
    pub mismatch_divisor: f64,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            mismatch_divisor: 2.0,
        }
    }
}

/// Score for a single candidate/gold pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    /// Final score in `0..=100`, penalty applied
    pub value: f64,
    /// True iff the candidate matched the gold line exactly
    pub exact: bool,
}

/// Unit-cost Levenshtein distance over characters, case-sensitive.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Rolling single-row DP
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = Vec::with_capacity(b.len() + 1);
        current.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let insert = current[j] + 1;
            let delete = prev[j + 1] + 1;
            let substitute = prev[j] + usize::from(ca != cb);
            current.push(insert.min(delete).min(substitute));
        }
        prev = current;
    }

    prev[b.len()]
}

/// Score a candidate line against a gold line.
///
/// The raw score is `(1 - distance / max_len) * 100`, clamped to 0 when the
/// distance reaches the longer length. Two empty strings are a perfect
/// trivial match. Any raw score below 100 is divided by the policy's
/// mismatch divisor.
pub fn score_line(candidate: &str, gold: &str, policy: &ScorePolicy) -> LineScore {
    let distance = levenshtein(candidate, gold);
    if distance == 0 {
        return LineScore {
            value: 100.0,
            exact: true,
        };
    }

    // distance > 0 implies at least one side is non-empty
    let max_len = candidate.chars().count().max(gold.chars().count());
    let raw = if distance >= max_len {
        0.0
    } else {
        (1.0 - distance as f64 / max_len as f64) * 100.0
    };

    LineScore {
        value: raw / policy.mismatch_divisor,
        exact: false,
    }
}
