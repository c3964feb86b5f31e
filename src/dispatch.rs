//! Operator dispatch table.
//!
//! Maps the operator token of a test line to an engine operation and
//! applies it. Nothing here parses or rounds; operands arrive as engine
//! values and the result goes back unchanged.

use crate::engine::{Context, DecimalEngine, EngineError, EngineResult};
use std::fmt;

/// Every operator name the table recognizes, in table order.
pub const OPERATOR_NAMES: &[&str] = &[
    "abs",
    "exp",
    "ln",
    "squareroot",
    "add",
    "subtract",
    "multiply",
    "divide",
    "power",
    "remainder",
    "max",
    "min",
    "compare",
];

/// An engine operation reachable from a test line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Abs,
    Exp,
    Ln,
    SquareRoot,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Remainder,
    Max,
    Min,
    Compare,
}

impl Operation {
    /// Look up an operator token. Tokens are already lower-cased.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let op = match name {
            "abs" => Self::Abs,
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "squareroot" => Self::SquareRoot,
            "add" => Self::Add,
            "subtract" => Self::Subtract,
            "multiply" => Self::Multiply,
            "divide" => Self::Divide,
            "power" => Self::Power,
            "remainder" => Self::Remainder,
            "max" => Self::Max,
            "min" => Self::Min,
            "compare" => Self::Compare,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::SquareRoot => "squareroot",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Remainder => "remainder",
            Self::Max => "max",
            Self::Min => "min",
            Self::Compare => "compare",
        }
    }

    /// Number of operands the operation consumes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Abs | Self::Exp | Self::Ln | Self::SquareRoot => 1,
            _ => 2,
        }
    }

    /// Run the operation.
    ///
    /// `operands` must hold exactly [`Self::arity`] values; the evaluator
    /// checks this before calling.
    ///
    /// # Errors
    ///
    /// Propagates whatever condition the engine reports.
    pub fn apply<E: DecimalEngine>(
        &self,
        engine: &E,
        operands: &[E::Value],
        ctx: &Context,
    ) -> EngineResult<E::Value> {
        match (self, operands) {
            (Self::Abs, [x]) => engine.abs(x, ctx),
            (Self::Exp, [x]) => engine.exp(x, ctx),
            (Self::Ln, [x]) => engine.ln(x, ctx),
            (Self::SquareRoot, [x]) => engine.sqrt(x, ctx),
            (Self::Add, [x, y]) => engine.add(x, y, ctx),
            (Self::Subtract, [x, y]) => engine.subtract(x, y, ctx),
            (Self::Multiply, [x, y]) => engine.multiply(x, y, ctx),
            (Self::Divide, [x, y]) => engine.divide(x, y, ctx),
            (Self::Power, [x, y]) => engine.power(x, y, ctx),
            (Self::Remainder, [x, y]) => engine.remainder(x, y, ctx),
            (Self::Max, [x, y]) => engine.max(x, y, ctx),
            (Self::Min, [x, y]) => engine.min(x, y, ctx),
            (Self::Compare, [x, y]) => engine.compare(x, y, ctx),
            (op, values) => Err(EngineError::InvalidOperation(format!(
                "{op} takes {} operand(s), got {}",
                op.arity(),
                values.len()
            ))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
