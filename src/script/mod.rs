//! Directive interpretation for test-vector scripts.
//!
//! Every line is classified before anything else happens to it. The prefix
//! checks run in a fixed order so that a directive keyword can never be
//! mistaken for a test name:
//!
//! 1. blank
//! 2. comment (`--`)
//! 3. inapplicable directives (`version`, `extended`, `maxexponent`, `minexponent`)
//! 4. `precision`
//! 5. `rounding`
//! 6. anything else is a test case

pub mod operand;

use crate::dialect::{Dialect, RoundingDirective};
use crate::error::{HarnessError, Result};
use crate::model::{OperandToken, TestCase};

/// Start of a comment line.
pub const COMMENT_MARKER: &str = "--";

/// Directives that do not apply to an engine without exponent limits.
pub const IGNORED_DIRECTIVES: &[&str] = &["version", "extended", "maxexponent", "minexponent"];

/// Every token either dialect accepts after `rounding:`.
pub const ROUNDING_TOKENS: &[&str] = &[
    "half_even",
    "half_up",
    "down",
    "zero",
    "half_down",
    "floor",
    "ceiling",
    "up",
];

const ARROW: &str = "->";

/// Classification of one normalized (lower-cased, trimmed) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    /// An inapplicable directive; carries its keyword.
    Ignored(&'static str),
    Precision(&'a str),
    Rounding(&'a str),
    Test(&'a str),
}

/// Classify a line that has already been lower-cased and trimmed.
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(COMMENT_MARKER) {
        return Line::Comment;
    }
    if let Some(keyword) = IGNORED_DIRECTIVES
        .iter()
        .find(|keyword| line.starts_with(**keyword))
    {
        return Line::Ignored(*keyword);
    }
    if line.starts_with("precision") {
        return Line::Precision(line);
    }
    if line.starts_with("rounding") {
        return Line::Rounding(line);
    }
    Line::Test(line)
}

/// Parse the value of a `precision:` directive.
///
/// Any 64-bit value is accepted. Values beyond `u32::MAX` saturate, which
/// leaves every representable result unrounded all the same.
///
/// # Errors
///
/// Returns `InvalidPrecision` if the first field after the prefix is not a
/// non-negative integer.
pub fn parse_precision(line: &str) -> Result<u32> {
    let rest = line.strip_prefix("precision:").unwrap_or(line).trim();
    let value = rest.split_whitespace().next().unwrap_or("");
    let precision = value
        .parse::<u64>()
        .map_err(|_| HarnessError::InvalidPrecision {
            value: value.to_string(),
        })?;
    Ok(u32::try_from(precision).unwrap_or(u32::MAX))
}

/// Parse the value of a `rounding:` directive under `dialect`.
///
/// Returns the declared token alongside its meaning.
///
/// # Errors
///
/// Returns `InvalidRounding` if the token is outside the dialect vocabulary.
pub fn parse_rounding(line: &str, dialect: Dialect) -> Result<(&str, RoundingDirective)> {
    let token = line.strip_prefix("rounding:").unwrap_or(line).trim();
    dialect
        .rounding(token)
        .map(|directive| (token, directive))
        .ok_or_else(|| HarnessError::InvalidRounding {
            mode: token.to_string(),
        })
}

/// A test line split into fields but not yet fully decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLine<'a> {
    text: &'a str,
    fields: Vec<&'a str>,
    dialect: Dialect,
}

impl<'a> TestLine<'a> {
    /// Split a test line into whitespace-delimited fields.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTest` if the line has fewer fields than the dialect
    /// requires.
    pub fn split(text: &'a str, dialect: Dialect) -> Result<Self> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < dialect.min_fields() {
            return Err(HarnessError::malformed(
                text,
                format!(
                    "expected at least {} fields, found {}",
                    dialect.min_fields(),
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            text,
            fields,
            dialect,
        })
    }

    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.fields[0]
    }

    #[must_use]
    pub fn operator(&self) -> &'a str {
        self.fields[1]
    }

    /// The decoded left operand.
    #[must_use]
    pub fn left(&self) -> OperandToken {
        operand::decode(self.fields[2])
    }

    /// Number of operands the line supplies.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self.dialect {
            Dialect::Fixed => 2,
            Dialect::Variable if self.fields[3] == ARROW || self.fields.len() < 6 => 1,
            Dialect::Variable => 2,
        }
    }

    /// Decode every operand and the expected value.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTest` if a variable-dialect line has no arrow where
    /// the expected value should follow.
    pub fn into_case(self) -> Result<TestCase> {
        let arity = self.arity();
        let expected_index = match self.dialect {
            Dialect::Fixed => 5,
            Dialect::Variable => {
                let arrow_index = arity + 2;
                if self.fields.get(arrow_index) != Some(&ARROW) {
                    return Err(HarnessError::malformed(
                        self.text,
                        format!("expected '{ARROW}' as field {}", arrow_index + 1),
                    ));
                }
                arrow_index + 1
            }
        };
        let Some(expected) = self.fields.get(expected_index) else {
            return Err(HarnessError::malformed(self.text, "missing expected value"));
        };

        let operands = self.fields[2..2 + arity]
            .iter()
            .map(|field| operand::decode(field))
            .collect();

        Ok(TestCase {
            name: self.name().to_string(),
            operator: self.operator().to_string(),
            operands,
            expected: operand::decode(expected),
        })
    }
}
