//! Square root, exponential, logarithm and power.
//!
//! `exp` and `ln` are evaluated in fixed point with guard digits and then
//! rounded once to the requested precision.

use super::parts::{self, Parts, digit_count, pow10, to_i64};
use super::{EngineError, EngineResult};
use crate::model::RoundingMode;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;

/// Extra digits carried through intermediate results.
const GUARD_DIGITS: u64 = 12;

/// `exp` refuses arguments with an adjusted exponent above this.
const EXP_MAX_ADJUSTED: i64 = 4;

/// Largest integral exponent handled by repeated multiplication.
const MAX_INTEGRAL_POWER: u64 = 999_999_999;

fn guarded(precision: u32) -> u32 {
    precision.saturating_add(u32::try_from(GUARD_DIGITS).unwrap_or(u32::MAX))
}

/// Correctly rounded square root; exact roots move toward `floor(exp / 2)`.
pub(super) fn sqrt(x: &Parts, precision: u32, mode: RoundingMode) -> EngineResult<Parts> {
    if x.is_negative() {
        return Err(EngineError::InvalidOperation(
            "square root of a negative number".to_string(),
        ));
    }
    let ideal = x.exp.div_euclid(2);
    if x.is_zero() {
        return Ok(Parts::new(BigInt::zero(), ideal));
    }

    let (mut coef, mut exp) = (x.coef.clone(), x.exp);
    if exp.rem_euclid(2) != 0 {
        coef *= BigInt::from(10u8);
        exp -= 1;
    }
    let half_digits = digit_count(&coef).div_ceil(2);
    let scale = (u64::from(precision) + 1).saturating_sub(half_digits) + 1;
    let radicand = coef * pow10(2 * scale);
    let root = radicand.sqrt();
    let exp = exp / 2 - to_i64(scale)?;

    let (root, exp) = if &root * &root == radicand {
        parts::strip_toward(root, exp, ideal)
    } else {
        parts::sticky(root, exp)
    };
    Ok(Parts::new(root, exp).round(precision, mode))
}

/// `x × 10^scale`, truncated toward zero.
fn to_fixed(x: &Parts, scale: u64) -> EngineResult<BigInt> {
    let shift = x.exp.saturating_add(to_i64(scale)?);
    Ok(if shift >= 0 {
        &x.coef * pow10(shift.unsigned_abs())
    } else {
        &x.coef / pow10(shift.unsigned_abs())
    })
}

/// `e^x` for `x >= 0` with at least `digits` correct fractional digits.
fn exp_fixed(x: &Parts, digits: u64) -> EngineResult<Parts> {
    // Halve until below one half so the series converges quickly.
    let probe_scale = digits + 2;
    let half = pow10(probe_scale) / BigInt::from(2u8);
    let mut probe = to_fixed(x, probe_scale)?;
    let mut halvings = 0usize;
    while probe >= half {
        probe >>= 1usize;
        halvings += 1;
    }

    let scale = digits + 10 + halvings as u64 / 3 + 1;
    let one = pow10(scale);
    let reduced = to_fixed(x, scale)? >> halvings;

    let mut sum = one.clone();
    let mut term = one.clone();
    let mut n = 1u32;
    loop {
        term = &term * &reduced / &one / BigInt::from(n);
        if term.is_zero() {
            break;
        }
        sum += &term;
        n += 1;
    }
    for _ in 0..halvings {
        sum = &sum * &sum / &one;
    }
    Ok(Parts::new(sum, -to_i64(scale)?))
}

pub(super) fn exp(x: &Parts, precision: u32, mode: RoundingMode) -> EngineResult<Parts> {
    if x.is_zero() {
        return Ok(Parts::one());
    }
    if x.adjusted() > EXP_MAX_ADJUSTED {
        return Err(EngineError::Overflow);
    }

    let working = guarded(precision);
    if x.adjusted() < -(i64::from(working) + 2) {
        // e^x is 1 + x to well past the working precision; a sticky digit
        // on the side of x keeps directed rounding honest.
        let digits = u64::from(working) + 3;
        let nudge = if x.is_negative() { -1 } else { 1 };
        let near_one = Parts::new(pow10(digits) + BigInt::from(nudge), -to_i64(digits)?);
        return Ok(near_one.round(precision, mode));
    }
    let grown = exp_fixed(&x.abs(), u64::from(working))?.round(working, RoundingMode::NearestEven);
    let result = if x.is_negative() {
        parts::divide(&Parts::one(), &grown, working, RoundingMode::NearestEven)?
    } else {
        grown
    };
    Ok(result.round(precision, mode))
}

/// `atanh(z)` for `|z| <= 1/3` in fixed point.
fn atanh(z: &BigInt, one: &BigInt) -> BigInt {
    let square = z * z / one;
    let mut power = z.clone();
    let mut sum = z.clone();
    let mut n = 1u32;
    loop {
        power = &power * &square / one;
        n += 2;
        let term = &power / BigInt::from(n);
        if term.is_zero() {
            break;
        }
        sum += term;
    }
    sum
}

pub(super) fn ln(x: &Parts, precision: u32, mode: RoundingMode) -> EngineResult<Parts> {
    if x.is_zero() || x.is_negative() {
        return Err(EngineError::InvalidOperation(
            "logarithm of a non-positive number".to_string(),
        ));
    }
    if parts::compare(x, &Parts::one()) == Ordering::Equal {
        return Ok(Parts::new(BigInt::zero(), 0));
    }

    // x = m × 10^decade with m in [0.1, 1)
    let digits = x.digits();
    let decade = x.exp.saturating_add(to_i64(digits)?);
    let mut scale = u64::from(guarded(precision)) + digit_count(&BigInt::from(decade));
    if decade == 0 || decade == 1 {
        // Cancellation near one needs as many extra digits as leading zeros
        // in x - 1.
        let distance = parts::add(x, &Parts::one().negated(), 0)?;
        scale += distance.adjusted().min(0).unsigned_abs();
    }

    let one = pow10(scale);
    let mut mantissa = if scale >= digits {
        &x.coef * pow10(scale - digits)
    } else {
        &x.coef / pow10(digits - scale)
    };
    let half = &one / BigInt::from(2u8);
    let mut doublings = 0u32;
    while mantissa < half {
        mantissa <<= 1usize;
        doublings += 1;
    }

    let two = BigInt::from(2u8);
    let z = (&mantissa - &one) * &one / (&mantissa + &one);
    let ln_mantissa = atanh(&z, &one) * &two;
    let ln2 = atanh(&(&one / BigInt::from(3u8)), &one) * &two;
    let ln10 = &ln2 * BigInt::from(3u8) + atanh(&(&one / BigInt::from(9u8)), &one) * &two;

    let total = ln_mantissa - &ln2 * BigInt::from(doublings) + ln10 * BigInt::from(decade);
    Ok(Parts::new(total, -to_i64(scale)?).round(precision, mode))
}

/// `Some(n)` when `y` is an integer small enough for repeated squaring.
fn integral_exponent(y: &Parts) -> Option<i64> {
    if y.is_zero() {
        return Some(0);
    }
    let value = if y.exp >= 0 {
        if y.adjusted() > 9 {
            return None;
        }
        &y.coef * pow10(y.exp.unsigned_abs())
    } else {
        // More fractional places than digits leaves a nonzero fraction.
        if y.exp.unsigned_abs() > y.digits() {
            return None;
        }
        let (quotient, remainder) = y.coef.div_rem(&pow10(y.exp.unsigned_abs()));
        if !remainder.is_zero() {
            return None;
        }
        quotient
    };
    let magnitude = u64::try_from(value.abs()).ok()?;
    if magnitude > MAX_INTEGRAL_POWER {
        return None;
    }
    i64::try_from(value).ok()
}

pub(super) fn power(x: &Parts, y: &Parts, precision: u32, mode: RoundingMode) -> EngineResult<Parts> {
    if let Some(n) = integral_exponent(y) {
        return integral_power(x, n, precision, mode);
    }
    if x.is_negative() {
        return Err(EngineError::InvalidOperation(
            "negative base with a non-integral exponent".to_string(),
        ));
    }
    if x.is_zero() {
        return if y.is_negative() {
            Err(EngineError::DivisionByZero)
        } else {
            Ok(Parts::new(BigInt::zero(), 0))
        };
    }

    let working = guarded(precision);
    let log = ln(x, working, RoundingMode::NearestEven)?;
    let product = parts::multiply(y, &log)?.round(working, RoundingMode::NearestEven);
    exp(&product, precision, mode)
}

fn integral_power(x: &Parts, n: i64, precision: u32, mode: RoundingMode) -> EngineResult<Parts> {
    if n == 0 {
        return if x.is_zero() {
            Err(EngineError::InvalidOperation("0 ** 0".to_string()))
        } else {
            Ok(Parts::one())
        };
    }
    if x.is_zero() && n < 0 {
        return Err(EngineError::DivisionByZero);
    }

    let mut remaining = n.unsigned_abs();
    let extra = u32::try_from(digit_count(&BigInt::from(remaining))).unwrap_or(u32::MAX);
    let working = precision.saturating_add(extra).saturating_add(2);

    let mut base = x.clone();
    let mut acc = Parts::one();
    loop {
        if remaining & 1 == 1 {
            acc = parts::multiply(&acc, &base)?.round(working, RoundingMode::NearestEven);
        }
        remaining >>= 1;
        if remaining == 0 {
            break;
        }
        base = parts::multiply(&base, &base)?.round(working, RoundingMode::NearestEven);
    }

    let result = if n < 0 {
        parts::divide(&Parts::one(), &acc, working, RoundingMode::NearestEven)?
    } else {
        acc
    };
    Ok(result.round(precision, mode))
}
