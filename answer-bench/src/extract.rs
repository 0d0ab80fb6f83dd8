//! Candidate answer extraction from raw model output
//!
//! Model responses are free text. The extractor reduces them to exactly
//! `expected` candidate lines: labeled mode keeps `Q<id>:` lines, batch mode
//! keeps every non-empty line. When a model restates or revises an answer the
//! final statement wins, so extraction keeps the last `expected` matches and
//! pads short output with empty candidates rather than failing.

use regex::Regex;
use std::sync::OnceLock;

fn labeled_pattern() -> &'static Regex {
    static LABELED_LINE: OnceLock<Regex> = OnceLock::new();
    LABELED_LINE.get_or_init(|| Regex::new(r"^Q[^:]+:").unwrap())
}

/// One extracted candidate line, label prefix included when present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    pub text: String,
}

impl CandidateLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Padding candidate for answers the model never produced
    pub fn empty() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extraction output: always exactly `expected` candidates
#[derive(Debug, Clone)]
pub struct Extraction {
    pub candidates: Vec<CandidateLine>,
    /// Matching lines found before truncation or padding
    pub matched: usize,
}

/// Extract answer lines of the shape `Q<id>: ...` from raw model output.
///
/// Candidates correspond to gold entries by position only; a mislabeled or
/// out-of-order answer scores against whatever gold line shares its slot.
pub fn extract_labeled(raw: &str, expected: usize) -> Extraction {
    let found: Vec<CandidateLine> = raw
        .lines()
        .map(str::trim)
        .filter(|line| labeled_pattern().is_match(line))
        .map(CandidateLine::new)
        .collect();

    clamp(found, expected)
}

/// Extract every non-empty line positionally (batch scoring mode).
pub fn extract_positional(raw: &str, expected: usize) -> Extraction {
    let found: Vec<CandidateLine> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(CandidateLine::new)
        .collect();

    clamp(found, expected)
}

fn clamp(mut found: Vec<CandidateLine>, expected: usize) -> Extraction {
    let matched = found.len();

    if matched >= expected {
        // Keep the last `expected` lines
        found.drain(..matched - expected);
    } else {
        found.resize(expected, CandidateLine::empty());
    }

    Extraction {
        candidates: found,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_basic() {
        let raw = "Here are my answers:\nQ1: Yes\nQ2: 42\nDone.";
        let extraction = extract_labeled(raw, 2);
        assert_eq!(extraction.matched, 2);
        assert_eq!(extraction.candidates[0].text, "Q1: Yes");
        assert_eq!(extraction.candidates[1].text, "Q2: 42");
    }

    #[test]
    fn test_labeled_keeps_last_n() {
        // 20 answer lines, the first four are drafts the model revised
        let mut raw = String::from("Q1: draft\nQ2: draft\nQ3: draft\nQ4: draft\n");
        for i in 1..=16 {
            raw.push_str(&format!("Q{}: final-{}\n", i, i));
        }

        let extraction = extract_labeled(&raw, 16);
        assert_eq!(extraction.matched, 20);
        assert_eq!(extraction.candidates.len(), 16);
        assert_eq!(extraction.candidates[0].text, "Q1: final-1");
        assert_eq!(extraction.candidates[15].text, "Q16: final-16");
    }

    #[test]
    fn test_labeled_pads_short_output() {
        let mut raw = String::new();
        for i in 1..=10 {
            raw.push_str(&format!("Q{}: answer\n", i));
        }

        let extraction = extract_labeled(&raw, 16);
        assert_eq!(extraction.matched, 10);
        assert_eq!(extraction.candidates.len(), 16);
        assert!(!extraction.candidates[9].is_empty());
        for candidate in &extraction.candidates[10..] {
            assert!(candidate.is_empty());
        }
    }

    #[test]
    fn test_labeled_ignores_prose_and_lowercase() {
        let raw = "q1: lowercase does not count\nQuestion: neither\nQ1: Yes\n";
        let extraction = extract_labeled(raw, 1);
        assert_eq!(extraction.matched, 1);
        assert_eq!(extraction.candidates[0].text, "Q1: Yes");
    }

    #[test]
    fn test_labeled_repeated_calls() {
        // The shared pattern serves every call, iteration after iteration
        for _ in 0..3 {
            let extraction = extract_labeled("Q1: Yes\nQ2: 42\n", 2);
            assert_eq!(extraction.matched, 2);
            assert_eq!(extraction.candidates[0].text, "Q1: Yes");
        }
    }

    #[test]
    fn test_labeled_trims_surrounding_whitespace() {
        let extraction = extract_labeled("   Q1: Yes   \n", 1);
        assert_eq!(extraction.candidates[0].text, "Q1: Yes");
    }

    #[test]
    fn test_positional_skips_blank_lines() {
        let raw = "first\n\n  \nsecond\nthird\n";
        let extraction = extract_positional(raw, 2);
        assert_eq!(extraction.matched, 3);
        assert_eq!(extraction.candidates[0].text, "second");
        assert_eq!(extraction.candidates[1].text, "third");
    }

    #[test]
    fn test_positional_pads() {
        let extraction = extract_positional("only line\n", 3);
        assert_eq!(extraction.matched, 1);
        assert_eq!(extraction.candidates.len(), 3);
        assert!(extraction.candidates[2].is_empty());
    }
}
