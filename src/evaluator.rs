//! Evaluation of a single test line.
//!
//! The order of checks matters: every sentinel is honored before the operator
//! is looked up, and every skip condition is decided before the engine is
//! asked to parse anything, so a skipped vector never reaches the engine.

use crate::dialect::{Dialect, PrecisionPolicy, UnknownOperatorPolicy};
use crate::dispatch::Operation;
use crate::engine::{DecimalEngine, EngineError};
use crate::error::{HarnessError, Result};
use crate::model::{FailureRecord, OperandToken, Outcome, RunCounters, SkipReason};
use crate::script::TestLine;
use crate::session::Session;
use tracing::{debug, info};

/// Runs test lines against an engine under one dialect.
#[derive(Debug)]
pub struct Evaluator<E> {
    engine: E,
    dialect: Dialect,
    internal_precision: u32,
}

impl<E: DecimalEngine> Evaluator<E> {
    #[must_use]
    pub const fn new(engine: E, dialect: Dialect, internal_precision: u32) -> Self {
        Self {
            engine,
            dialect,
            internal_precision,
        }
    }

    pub const fn engine(&self) -> &E {
        &self.engine
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Evaluate one test line and count it.
    ///
    /// # Errors
    ///
    /// Returns a script error when the line cannot be scored at all: too few
    /// fields, an unknown operator under a strict dialect, a wrong operand
    /// count, or a literal the engine cannot parse.
    pub fn evaluate(
        &self,
        text: &str,
        session: &Session,
        counters: &mut RunCounters,
    ) -> Result<Outcome> {
        counters.begin();
        let outcome = self.score(text, session)?;
        counters.record(&outcome);
        Ok(outcome)
    }

    fn score(&self, text: &str, session: &Session) -> Result<Outcome> {
        if session.skip_active() {
            info!(
                line = text,
                precision = session.precision(),
                rounding = session.rounding_name(),
                "Skipping test under unsupported rounding mode"
            );
            return Ok(Outcome::Skipped(SkipReason::UnsupportedRounding));
        }

        let line = TestLine::split(text, self.dialect)?;
        if line.left().is_sentinel() {
            info!(name = line.name(), "Skipping test with sentinel operand");
            return Ok(Outcome::Skipped(SkipReason::OperandSentinel));
        }

        let line_text = line.text();
        let case = line.into_case()?;
        if case.operands.iter().any(OperandToken::is_sentinel) {
            info!(name = %case.name, "Skipping test with sentinel operand");
            return Ok(Outcome::Skipped(SkipReason::OperandSentinel));
        }
        let Some(expected_literal) = case.expected.as_literal() else {
            info!(name = %case.name, "Skipping test with unconstrained result");
            return Ok(Outcome::Skipped(SkipReason::ExpectedSentinel));
        };

        let Some(operation) = Operation::lookup(&case.operator) else {
            return match self.dialect.unknown_operator_policy() {
                UnknownOperatorPolicy::Fatal => Err(HarnessError::UnknownOperator {
                    op: case.operator.clone(),
                }),
                UnknownOperatorPolicy::Skip => {
                    info!(
                        name = %case.name,
                        op = %case.operator,
                        "Skipping test with unknown operator"
                    );
                    Ok(Outcome::Skipped(SkipReason::UnknownOperator))
                }
            };
        };
        if operation.arity() != case.operands.len() {
            return Err(HarnessError::ArityMismatch {
                op: operation.to_string(),
                expected: operation.arity(),
                found: case.operands.len(),
            });
        }

        let parse_precision = self.dialect.parse_precision(self.internal_precision);
        let operands = case
            .operands
            .iter()
            .filter_map(OperandToken::as_literal)
            .map(|literal| self.parse(literal, parse_precision))
            .collect::<Result<Vec<_>>>()?;
        let expected = self.parse(expected_literal, parse_precision)?;

        let ctx = session.context();
        let result = match self.dialect.precision_policy() {
            PrecisionPolicy::RoundResult => operation
                .apply(
                    &self.engine,
                    &operands,
                    &ctx.with_precision(self.internal_precision),
                )
                .map(|value| self.engine.round(&value, &ctx)),
            PrecisionPolicy::RoundOperands => {
                let rounded: Vec<_> = operands
                    .iter()
                    .map(|value| self.engine.round(value, &ctx))
                    .collect();
                operation.apply(&self.engine, &rounded, &ctx)
            }
        };

        let computed = match result {
            Ok(value) => self.engine.render(&value),
            Err(e) => {
                debug!(name = %case.name, error = %e, "Engine reported a condition");
                e.to_string()
            }
        };
        let expected = self.engine.render(&expected);
        debug!(
            name = %case.name,
            %computed,
            %expected,
            precision = session.precision(),
            rounding = session.rounding_name(),
            "Evaluated"
        );

        if computed == expected {
            return Ok(Outcome::Passed);
        }
        Ok(Outcome::Failed(FailureRecord {
            name: case.name,
            line: line_text.to_string(),
            computed,
            expected,
            precision: session.precision(),
            rounding: session.rounding_name().to_string(),
        }))
    }

    fn parse(&self, literal: &str, precision: u32) -> Result<E::Value> {
        self.engine
            .parse(literal, precision)
            .map_err(|e| HarnessError::UnparsableOperand {
                literal: literal.to_string(),
                reason: match e {
                    EngineError::Parse { reason, .. } => reason,
                    other => other.to_string(),
                },
            })
    }
}
