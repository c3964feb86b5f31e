//! Test-vector dialects.
//!
//! Two grammars share one harness. Everything that differs between them is
//! answered here, so the interpreter and evaluator never branch on the
//! dialect directly.

use crate::error::{HarnessError, Result};
use crate::model::RoundingMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precision used to parse literals and run operations when the dialect
/// rounds only the final result.
pub const DEFAULT_INTERNAL_PRECISION: u32 = 34;

/// Which test-vector grammar a run expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `<name> <op> '<l>' '<r>' -> '<expected>'`, always two operands.
    #[default]
    Fixed,
    /// `<name> <op> '<l>' ['<r>'] -> '<expected>'`, with sentinels.
    Variable,
}

/// What a `rounding:` token means under a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingDirective {
    Mode(RoundingMode),
    /// Recognized, but the engine cannot honor it.
    Unsupported,
}

/// What to do with an operator missing from the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOperatorPolicy {
    Fatal,
    Skip,
}

/// Where the session precision is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionPolicy {
    /// Operands are parsed and the operation runs at the internal precision;
    /// the result is then rounded to the session precision.
    RoundResult,
    /// Operands are parsed exactly and rounded to the session precision; the
    /// operation runs at the session precision and the result is kept as is.
    RoundOperands,
}

impl Dialect {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }

    /// Minimum number of whitespace-separated fields on a test line.
    #[must_use]
    pub const fn min_fields(&self) -> usize {
        match self {
            Self::Fixed => 6,
            Self::Variable => 5,
        }
    }

    /// Map a `rounding:` token. `None` means the token is not part of the
    /// vocabulary at all.
    #[must_use]
    pub fn rounding(&self, token: &str) -> Option<RoundingDirective> {
        let directive = match (self, token) {
            (_, "half_even") => RoundingDirective::Mode(RoundingMode::NearestEven),
            (_, "half_up") => RoundingDirective::Mode(RoundingMode::NearestAwayFromZero),
            (_, "zero") | (Self::Fixed, "down") => {
                RoundingDirective::Mode(RoundingMode::TowardZero)
            }
            (Self::Variable, "down") | (_, "half_down" | "floor" | "ceiling" | "up") => {
                RoundingDirective::Unsupported
            }
            _ => return None,
        };
        Some(directive)
    }

    #[must_use]
    pub const fn unknown_operator_policy(&self) -> UnknownOperatorPolicy {
        match self {
            Self::Fixed => UnknownOperatorPolicy::Fatal,
            Self::Variable => UnknownOperatorPolicy::Skip,
        }
    }

    #[must_use]
    pub const fn precision_policy(&self) -> PrecisionPolicy {
        match self {
            Self::Fixed => PrecisionPolicy::RoundResult,
            Self::Variable => PrecisionPolicy::RoundOperands,
        }
    }

    /// Precision handed to the engine when parsing literals. Zero means exact.
    #[must_use]
    pub const fn parse_precision(&self, internal_precision: u32) -> u32 {
        match self.precision_policy() {
            PrecisionPolicy::RoundResult => internal_precision,
            PrecisionPolicy::RoundOperands => 0,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            other => Err(HarnessError::Config(format!(
                "unknown dialect '{other}' (expected 'fixed' or 'variable')"
            ))),
        }
    }
}
