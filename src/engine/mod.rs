//! Interface to the decimal arithmetic engine under test.
//!
//! The harness never does arithmetic itself. It parses literals, applies
//! rounding, calls operations and renders results exclusively through
//! [`DecimalEngine`]. [`BigDecimalEngine`] is the engine shipped with the
//! binary; tests substitute spies.

mod bigdecimal;
mod parts;
#[cfg(test)]
pub(crate) mod spy;
mod transcendental;

pub use self::bigdecimal::BigDecimalEngine;

use crate::model::RoundingMode;
use std::fmt;
use thiserror::Error;

/// Precision and rounding for one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Significant digits. Zero means unlimited.
    pub precision: u32,
    pub rounding: RoundingMode,
}

impl Context {
    #[must_use]
    pub const fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
        }
    }

    /// Same rounding, different precision.
    #[must_use]
    pub const fn with_precision(self, precision: u32) -> Self {
        Self::new(precision, self.rounding)
    }
}

/// Conditions an engine reports instead of a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The literal is not a decimal number. Always fatal to the run.
    #[error("invalid decimal literal '{literal}': {reason}")]
    Parse { literal: String, reason: String },

    #[error("division by zero")]
    DivisionByZero,

    /// Integer part of a remainder quotient exceeds the precision.
    #[error("division impossible")]
    DivisionImpossible,

    /// Result magnitude the engine refuses to materialize.
    #[error("overflow")]
    Overflow,

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Operations a decimal engine must expose to be tested by this harness.
///
/// Every arithmetic method rounds its result to `ctx`. Values are owned by
/// the engine; the harness only holds them for the duration of one test.
///
/// Arithmetic methods return an [`EngineError`] for conditions such as
/// division by zero. The harness scores those as failed tests.
#[allow(clippy::missing_errors_doc)]
pub trait DecimalEngine {
    type Value: Clone + fmt::Debug;

    /// Parse a literal. When it has more significant digits than
    /// `working_precision` it is rounded half-even; zero keeps it exact.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] for anything that is not a decimal.
    fn parse(&self, literal: &str, working_precision: u32) -> EngineResult<Self::Value>;

    /// Round `value` to the context precision with the context mode.
    fn round(&self, value: &Self::Value, ctx: &Context) -> Self::Value;

    /// Canonical string form used for oracle comparison.
    fn render(&self, value: &Self::Value) -> String;

    fn abs(&self, x: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    fn exp(&self, x: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    /// Natural logarithm.
    fn ln(&self, x: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    fn sqrt(&self, x: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;

    fn add(&self, x: &Self::Value, y: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    fn subtract(&self, x: &Self::Value, y: &Self::Value, ctx: &Context)
    -> EngineResult<Self::Value>;
    fn multiply(&self, x: &Self::Value, y: &Self::Value, ctx: &Context)
    -> EngineResult<Self::Value>;
    fn divide(&self, x: &Self::Value, y: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    fn power(&self, x: &Self::Value, y: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    /// Truncating remainder; the sign follows `x`.
    fn remainder(
        &self,
        x: &Self::Value,
        y: &Self::Value,
        ctx: &Context,
    ) -> EngineResult<Self::Value>;
    fn max(&self, x: &Self::Value, y: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    fn min(&self, x: &Self::Value, y: &Self::Value, ctx: &Context) -> EngineResult<Self::Value>;
    /// Numeric comparison as a value: `-1`, `0` or `1`.
    fn compare(&self, x: &Self::Value, y: &Self::Value, ctx: &Context)
    -> EngineResult<Self::Value>;
}
