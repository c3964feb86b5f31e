//! Session state mutated by directives and read by every later test.

use crate::dialect::RoundingDirective;
use crate::engine::Context;
use crate::model::RoundingMode;

/// Active precision and rounding for the lines that follow.
///
/// Directives overwrite fields; tests only read them. A session outlives a
/// single source: multiple files given to one run share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    precision: u32,
    rounding: RoundingMode,
    /// Rounding token exactly as the script declared it.
    rounding_name: String,
    skip_active: bool,
}

impl Session {
    #[must_use]
    pub fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
            rounding_name: rounding.as_str().to_string(),
            skip_active: false,
        }
    }

    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    #[must_use]
    pub fn rounding_name(&self) -> &str {
        &self.rounding_name
    }

    #[must_use]
    pub const fn skip_active(&self) -> bool {
        self.skip_active
    }

    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision;
    }

    /// Apply a rounding directive. The skip flag is recomputed every time.
    ///
    /// An unsupported mode leaves the previous engine mode in place; it is
    /// never used while the skip flag is set.
    pub fn set_rounding(&mut self, token: &str, directive: RoundingDirective) {
        self.rounding_name = token.to_string();
        match directive {
            RoundingDirective::Mode(mode) => {
                self.rounding = mode;
                self.skip_active = false;
            }
            RoundingDirective::Unsupported => self.skip_active = true,
        }
    }

    /// Engine context at the session precision.
    #[must_use]
    pub const fn context(&self) -> Context {
        Context::new(self.precision, self.rounding)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0, RoundingMode::NearestEven)
    }
}
