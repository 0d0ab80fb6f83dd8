//! Gold answer sets
//!
//! A gold set is the ordered list of expected answers the benchmark scores
//! against. Each entry carries its question label (`Q1`, `Q2`, ...) and the
//! expected answer text; scoring always compares the full rendered line,
//! label included.

use std::fs;
use std::path::Path;

/// A single expected answer with its question label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldLine {
    pub label: String,
    pub answer: String,
}

impl GoldLine {
    pub fn new(label: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            answer: answer.into(),
        }
    }

    /// Full line form used for scoring, e.g. `Q1: 2025-01-31`
    pub fn line(&self) -> String {
        format!("{}: {}", self.label, self.answer)
    }
}

/// Errors from loading or validating a gold set
#[derive(Debug, thiserror::Error)]
pub enum GoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed gold line {line_no}: {line:?} (expected 'Q<n>: answer')")]
    Malformed { line_no: usize, line: String },

    #[error("unexpected label {found:?} at line {line_no}, expected Q{expected}")]
    OutOfOrder {
        line_no: usize,
        expected: usize,
        found: String,
    },

    #[error("gold set is empty")]
    Empty,
}

/// Immutable ordered set of expected answers
#[derive(Debug, Clone)]
pub struct GoldSet {
    lines: Vec<GoldLine>,
}

impl GoldSet {
    /// Create a gold set from pre-built lines. An empty set is rejected:
    /// the evaluator has nothing to score against and every average would
    /// divide by zero.
    pub fn new(lines: Vec<GoldLine>) -> Result<Self, GoldError> {
        if lines.is_empty() {
            return Err(GoldError::Empty);
        }
        Ok(Self { lines })
    }

    /// The built-in reference set of 16 questions.
    pub fn reference() -> Self {
        let answers = [
            "2025-01-31",
            "$2,200,000.00",
            "CZ-799",
            "25MB",
            "I don't know",
            "No",
            "Evelyn Reed",
            "$1,870,000.00",
            "General Data Protection Regulation",
            "3",
            "Signal",
            "Voice notes",
            "100",
            "I don't know",
            "15%",
            "$1,620,000.00",
        ];

        let lines = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| GoldLine::new(format!("Q{}", i + 1), *answer))
            .collect();

        Self { lines }
    }

    /// Load a gold set from a text file of `Q<n>: answer` lines.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GoldError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a gold set from text. Blank lines are skipped; labels must run
    /// `Q1..QN` in order with no gaps.
    pub fn parse(content: &str) -> Result<Self, GoldError> {
        let mut lines = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (label, answer) = line.split_once(':').ok_or_else(|| GoldError::Malformed {
                line_no: idx + 1,
                line: line.to_string(),
            })?;

            let label = label.trim();
            let expected = lines.len() + 1;
            if label != format!("Q{}", expected) {
                return Err(GoldError::OutOfOrder {
                    line_no: idx + 1,
                    expected,
                    found: label.to_string(),
                });
            }

            lines.push(GoldLine::new(label, answer.trim()));
        }

        Self::new(lines)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[GoldLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reference_set() {
        let gold = GoldSet::reference();
        assert_eq!(gold.len(), 16);
        assert_eq!(gold.lines()[0].line(), "Q1: 2025-01-31");
        assert_eq!(gold.lines()[15].line(), "Q16: $1,620,000.00");
    }

    #[test]
    fn test_parse_valid() {
        let gold = GoldSet::parse("Q1: Yes\n\nQ2: 42\nQ3: No\n").unwrap();
        assert_eq!(gold.len(), 3);
        assert_eq!(gold.lines()[1].label, "Q2");
        assert_eq!(gold.lines()[1].answer, "42");
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(GoldSet::parse(""), Err(GoldError::Empty)));
        assert!(matches!(GoldSet::parse("\n\n"), Err(GoldError::Empty)));
    }

    #[test]
    fn test_parse_gap_in_labels() {
        let err = GoldSet::parse("Q1: Yes\nQ3: No\n").unwrap_err();
        match err {
            GoldError::OutOfOrder {
                expected, found, ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(found, "Q3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = GoldSet::parse("Q1 Yes\n").unwrap_err();
        assert!(matches!(err, GoldError::Malformed { line_no: 1, .. }));
    }

    #[test]
    fn test_answer_keeps_colons() {
        let gold = GoldSet::parse("Q1: 12:30 PM\n").unwrap();
        assert_eq!(gold.lines()[0].answer, "12:30 PM");
        assert_eq!(gold.lines()[0].line(), "Q1: 12:30 PM");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Q1: Alpha").unwrap();
        writeln!(file, "Q2: Beta").unwrap();

        let gold = GoldSet::from_file(file.path()).unwrap();
        assert_eq!(gold.len(), 2);
        assert_eq!(gold.lines()[0].answer, "Alpha");
    }
}
