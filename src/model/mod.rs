//! Core data types for `dectest`.
//!
//! This module defines the values that flow through a run:
//! - `RoundingMode` - Rounding modes the engine must honor
//! - `OperandToken` - A decoded operand or expected-result field
//! - `TestCase` - One tokenized test line
//! - `Outcome` - What happened to a test
//! - `RunCounters` - Aggregate tally for the whole process

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounding modes supported by the engine.
///
/// Script vocabularies that name other modes (floor, ceiling, ...) never
/// reach the engine; they switch the session into skip mode instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half to even (banker's rounding).
    #[default]
    NearestEven,
    /// Round half away from zero.
    NearestAwayFromZero,
    /// Truncate.
    TowardZero,
}

impl RoundingMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NearestEven => "half_even",
            Self::NearestAwayFromZero => "half_up",
            Self::TowardZero => "down",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded operand or expected-result token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandToken {
    /// A value to hand to the engine unchanged.
    Literal(String),
    /// `?`: the oracle does not constrain the result.
    Unconstrained,
    /// `#`: the vector does not apply to this engine.
    ForcedSkip,
}

impl OperandToken {
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Unconstrained | Self::ForcedSkip => None,
        }
    }
}

/// One tokenized test line. Built and consumed per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub operator: String,
    /// One or two operands, in script order.
    pub operands: Vec<OperandToken>,
    pub expected: OperandToken,
}

/// Why a test was counted as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The active rounding directive names a mode the engine lacks.
    UnsupportedRounding,
    /// An operand is a sentinel.
    OperandSentinel,
    /// The expected value is a sentinel.
    ExpectedSentinel,
    /// The operator is unknown and the dialect tolerates that.
    UnknownOperator,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedRounding => "unsupported rounding mode",
            Self::OperandSentinel => "operand sentinel",
            Self::ExpectedSentinel => "expected-value sentinel",
            Self::UnknownOperator => "unknown operator",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic for a computed value that differs from the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub name: String,
    /// The full (lower-cased, trimmed) test line.
    pub line: String,
    pub computed: String,
    pub expected: String,
    pub precision: u32,
    /// Rounding token as declared by the script.
    pub rounding: String,
}

/// Result of evaluating a single test line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(FailureRecord),
    Skipped(SkipReason),
}

/// Aggregate tally. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl RunCounters {
    /// Count a test that has started evaluation.
    pub fn begin(&mut self) {
        self.total += 1;
    }

    /// Count the outcome of a test previously passed to [`Self::begin`].
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => self.succeeded += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }

    /// `total == succeeded + failed + skipped`.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.total == self.succeeded + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_stay_balanced() {
        let mut counters = RunCounters::default();
        for outcome in [
            Outcome::Passed,
            Outcome::Skipped(SkipReason::OperandSentinel),
            Outcome::Failed(FailureRecord {
                name: "t".to_string(),
                line: "t add '1' '1' -> '3'".to_string(),
                computed: "2".to_string(),
                expected: "3".to_string(),
                precision: 9,
                rounding: "half_even".to_string(),
            }),
        ] {
            counters.begin();
            counters.record(&outcome);
        }
        assert_eq!(counters.total, 3);
        assert_eq!(counters.succeeded, 1);
        assert_eq!(counters.failed, 1);
        assert_eq!(counters.skipped, 1);
        assert!(counters.is_balanced());
    }

    #[test]
    fn sentinel_tokens() {
        assert!(OperandToken::ForcedSkip.is_sentinel());
        assert!(OperandToken::Unconstrained.is_sentinel());
        let literal = OperandToken::Literal("1.5".to_string());
        assert!(!literal.is_sentinel());
        assert_eq!(literal.as_literal(), Some("1.5"));
    }

    #[test]
    fn rounding_mode_display() {
        assert_eq!(RoundingMode::NearestEven.to_string(), "half_even");
        assert_eq!(RoundingMode::default(), RoundingMode::NearestEven);
    }
}
