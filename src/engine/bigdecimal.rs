//! The engine bundled with the binary, backed by [`BigDecimal`] values.

use super::parts::{self, Parts};
use super::transcendental;
use super::{Context, DecimalEngine, EngineError, EngineResult};
use crate::dialect::DEFAULT_INTERNAL_PRECISION;
use crate::model::RoundingMode;
use ::bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::str::FromStr;

/// Arbitrary-precision engine for finite decimals.
///
/// Exact operations (add, subtract, multiply, abs, remainder) honour an
/// unlimited context. Operations whose result may not terminate fall back
/// to the internal precision when the context has none.
#[derive(Debug, Clone, Copy)]
pub struct BigDecimalEngine {
    internal_precision: u32,
}

impl BigDecimalEngine {
    #[must_use]
    pub const fn new(internal_precision: u32) -> Self {
        Self { internal_precision }
    }

    const fn inexact_precision(&self, ctx: &Context) -> u32 {
        if ctx.precision > 0 {
            ctx.precision
        } else if self.internal_precision > 0 {
            self.internal_precision
        } else {
            DEFAULT_INTERNAL_PRECISION
        }
    }
}

impl Default for BigDecimalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INTERNAL_PRECISION)
    }
}

fn split(value: &BigDecimal) -> Parts {
    let (coef, scale) = value.as_bigint_and_exponent();
    Parts::new(coef, scale.saturating_neg())
}

fn join(parts: Parts) -> BigDecimal {
    BigDecimal::new(parts.coef, parts.exp.saturating_neg())
}

fn finish(parts: Parts, ctx: &Context) -> BigDecimal {
    join(parts.round(ctx.precision, ctx.rounding))
}

/// Ties between numerically equal operands go to the larger exponent for
/// positive values and the smaller for negative ones.
fn larger<'a>(a: &'a Parts, b: &'a Parts) -> &'a Parts {
    match parts::compare(a, b) {
        Ordering::Greater => a,
        Ordering::Less => b,
        Ordering::Equal => {
            let a_wins = if a.is_negative() {
                a.exp <= b.exp
            } else {
                a.exp >= b.exp
            };
            if a_wins { a } else { b }
        }
    }
}

fn smaller<'a>(a: &'a Parts, b: &'a Parts) -> &'a Parts {
    if std::ptr::eq(larger(a, b), a) { b } else { a }
}

impl DecimalEngine for BigDecimalEngine {
    type Value = BigDecimal;

    fn parse(&self, literal: &str, working_precision: u32) -> EngineResult<BigDecimal> {
        let invalid = |reason: String| EngineError::Parse {
            literal: literal.to_string(),
            reason,
        };
        if literal.is_empty() {
            return Err(invalid("empty literal".to_string()));
        }
        if literal.chars().any(char::is_whitespace) {
            return Err(invalid("embedded whitespace".to_string()));
        }
        let value = BigDecimal::from_str(literal).map_err(|e| invalid(e.to_string()))?;
        Ok(join(
            split(&value).round(working_precision, RoundingMode::NearestEven),
        ))
    }

    fn round(&self, value: &BigDecimal, ctx: &Context) -> BigDecimal {
        finish(split(value), ctx)
    }

    fn render(&self, value: &BigDecimal) -> String {
        split(value).to_sci_string()
    }

    fn abs(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        Ok(finish(split(x).abs(), ctx))
    }

    fn exp(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let result = transcendental::exp(&split(x), self.inexact_precision(ctx), ctx.rounding)?;
        Ok(join(result))
    }

    fn ln(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let result = transcendental::ln(&split(x), self.inexact_precision(ctx), ctx.rounding)?;
        Ok(join(result))
    }

    fn sqrt(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let result = transcendental::sqrt(&split(x), self.inexact_precision(ctx), ctx.rounding)?;
        Ok(join(result))
    }

    fn add(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let sum = parts::add(&split(x), &split(y), ctx.precision)?;
        Ok(finish(sum, ctx))
    }

    fn subtract(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let difference = parts::add(&split(x), &split(y).negated(), ctx.precision)?;
        Ok(finish(difference, ctx))
    }

    fn multiply(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let product = parts::multiply(&split(x), &split(y))?;
        Ok(finish(product, ctx))
    }

    fn divide(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let quotient = parts::divide(
            &split(x),
            &split(y),
            self.inexact_precision(ctx),
            ctx.rounding,
        )?;
        Ok(join(quotient))
    }

    fn power(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let result = transcendental::power(
            &split(x),
            &split(y),
            self.inexact_precision(ctx),
            ctx.rounding,
        )?;
        Ok(join(result))
    }

    fn remainder(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let rest = parts::remainder(&split(x), &split(y), ctx.precision)?;
        Ok(finish(rest, ctx))
    }

    fn max(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let (a, b) = (split(x), split(y));
        Ok(finish(larger(&a, &b).clone(), ctx))
    }

    fn min(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        let (a, b) = (split(x), split(y));
        Ok(finish(smaller(&a, &b).clone(), ctx))
    }

    fn compare(&self, x: &BigDecimal, y: &BigDecimal, _ctx: &Context) -> EngineResult<BigDecimal> {
        let ordering = parts::compare(&split(x), &split(y));
        Ok(join(Parts::new(BigInt::from(ordering as i8), 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> BigDecimalEngine {
        BigDecimalEngine::default()
    }

    fn ctx(precision: u32) -> Context {
        Context::new(precision, RoundingMode::NearestEven)
    }

    fn value(literal: &str) -> BigDecimal {
        engine().parse(literal, 0).unwrap()
    }

    fn show(result: EngineResult<BigDecimal>) -> String {
        engine().render(&result.unwrap())
    }

    #[test]
    fn parse_keeps_trailing_zeros_and_exponents() {
        let e = engine();
        assert_eq!(e.render(&value("1.20")), "1.20");
        assert_eq!(e.render(&value("1e+5")), "1E+5");
        assert_eq!(e.render(&value("-0.0000001")), "-1E-7");
        assert_eq!(e.render(&value("100")), "100");
        assert_eq!(e.render(&value(".5")), "0.5");
    }

    #[test]
    fn parse_rounds_to_working_precision() {
        let e = engine();
        let v = e.parse("1.23456789012345678901234567890123456789", 34).unwrap();
        assert_eq!(e.render(&v), "1.234567890123456789012345678901235");
        let v = e.parse("2.5", 1).unwrap();
        assert_eq!(e.render(&v), "2");
    }

    #[test]
    fn parse_rejects_non_numbers() {
        for literal in ["", "abc", "inf", "nan", "1..2", "1 2"] {
            let err = engine().parse(literal, 0).unwrap_err();
            assert!(matches!(err, EngineError::Parse { .. }), "{literal}");
        }
    }

    #[test]
    fn round_applies_context_mode() {
        let e = engine();
        let v = value("1.25");
        assert_eq!(e.render(&e.round(&v, &ctx(2))), "1.2");
        let up = Context::new(2, RoundingMode::NearestAwayFromZero);
        assert_eq!(e.render(&e.round(&v, &up)), "1.3");
        let down = Context::new(2, RoundingMode::TowardZero);
        assert_eq!(e.render(&e.round(&value("1.29"), &down)), "1.2");
        assert_eq!(e.render(&e.round(&value("3"), &ctx(9))), "3");
    }

    #[test]
    fn arithmetic_at_precision() {
        let e = engine();
        assert_eq!(show(e.add(&value("1"), &value("2"), &ctx(9))), "3");
        assert_eq!(show(e.add(&value("12345"), &value("0.6789"), &ctx(5))), "12346");
        assert_eq!(show(e.subtract(&value("1.30"), &value("1.07"), &ctx(9))), "0.23");
        assert_eq!(show(e.multiply(&value("1.20"), &value("3"), &ctx(9))), "3.60");
        assert_eq!(show(e.divide(&value("1"), &value("3"), &ctx(9))), "0.333333333");
        assert_eq!(show(e.abs(&value("-1.0"), &ctx(9))), "1.0");
        assert_eq!(show(e.remainder(&value("7"), &value("3"), &ctx(9))), "1");
    }

    #[test]
    fn unlimited_context_falls_back_for_inexact_results() {
        let e = BigDecimalEngine::new(5);
        let third = e.divide(&value("1"), &value("3"), &ctx(0)).unwrap();
        assert_eq!(e.render(&third), "0.33333");
        let sum = e.add(&value("123456789"), &value("0.000001"), &ctx(0)).unwrap();
        assert_eq!(e.render(&sum), "123456789.000001");
    }

    #[test]
    fn transcendental_through_engine() {
        let e = engine();
        assert_eq!(show(e.sqrt(&value("2"), &ctx(9))), "1.41421356");
        assert_eq!(show(e.exp(&value("1"), &ctx(9))), "2.71828183");
        assert_eq!(show(e.ln(&value("10"), &ctx(9))), "2.30258509");
        assert_eq!(show(e.power(&value("2"), &value("10"), &ctx(9))), "1024");
    }

    #[test]
    fn max_min_break_ties_by_exponent() {
        let e = engine();
        assert_eq!(show(e.max(&value("1"), &value("1.0"), &ctx(9))), "1");
        assert_eq!(show(e.min(&value("1"), &value("1.0"), &ctx(9))), "1.0");
        assert_eq!(show(e.max(&value("-1"), &value("-1.0"), &ctx(9))), "-1.0");
        assert_eq!(show(e.min(&value("-1"), &value("-1.0"), &ctx(9))), "-1");
        assert_eq!(show(e.max(&value("-3"), &value("2"), &ctx(9))), "2");
        assert_eq!(show(e.min(&value("-3"), &value("2"), &ctx(9))), "-3");
    }

    #[test]
    fn compare_yields_sign() {
        let e = engine();
        assert_eq!(show(e.compare(&value("1"), &value("2"), &ctx(9))), "-1");
        assert_eq!(show(e.compare(&value("2.0"), &value("2"), &ctx(9))), "0");
        assert_eq!(show(e.compare(&value("3"), &value("-2"), &ctx(9))), "1");
    }

    #[test]
    fn errors_surface_as_engine_errors() {
        let e = engine();
        assert_eq!(
            e.divide(&value("1"), &value("0"), &ctx(9)).unwrap_err(),
            EngineError::DivisionByZero
        );
        assert!(matches!(
            e.sqrt(&value("-4"), &ctx(9)).unwrap_err(),
            EngineError::InvalidOperation(_)
        ));
    }
}
