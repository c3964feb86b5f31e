//! Coefficient/exponent arithmetic behind the bundled engine.
//!
//! A value is `coef × 10^exp`. Trailing zeros in the coefficient are
//! significant and never stripped unless an operation defines an ideal
//! exponent for exact results.

use super::{EngineError, EngineResult};
use crate::model::RoundingMode;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Largest decimal shift materialized when aligning two exponents.
const MAX_SHIFT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Parts {
    pub coef: BigInt,
    pub exp: i64,
}

pub(super) fn pow10(n: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), usize::try_from(n).unwrap_or(usize::MAX))
}

fn checked_pow10(n: u64) -> EngineResult<BigInt> {
    if n > MAX_SHIFT {
        return Err(EngineError::Overflow);
    }
    Ok(pow10(n))
}

pub(super) fn to_i64(n: u64) -> EngineResult<i64> {
    i64::try_from(n).map_err(|_| EngineError::Overflow)
}

/// Number of decimal digits in `n` (zero has one digit).
pub(super) fn digit_count(n: &BigInt) -> u64 {
    n.magnitude().to_string().len() as u64
}

/// Remove trailing zeros while the exponent stays at or below `ideal`.
pub(super) fn strip_toward(mut coef: BigInt, mut exp: i64, ideal: i64) -> (BigInt, i64) {
    let ten = BigInt::from(10u8);
    while exp < ideal && !coef.is_zero() {
        let (quotient, remainder) = coef.div_rem(&ten);
        if !remainder.is_zero() {
            break;
        }
        coef = quotient;
        exp += 1;
    }
    (coef, exp)
}

/// Append a sticky digit so a later rounding sees "a little more than".
pub(super) fn sticky(coef: BigInt, exp: i64) -> (BigInt, i64) {
    (coef * BigInt::from(10u8) + BigInt::one(), exp - 1)
}

impl Parts {
    pub fn new(coef: BigInt, exp: i64) -> Self {
        Self { coef, exp }
    }

    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    pub fn digits(&self) -> u64 {
        digit_count(&self.coef)
    }

    /// Exponent of the most significant digit.
    pub fn adjusted(&self) -> i64 {
        self.exp.saturating_add(to_i64(self.digits()).unwrap_or(i64::MAX)) - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coef.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.coef.is_negative()
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.coef.abs(), self.exp)
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        Self::new(-&self.coef, self.exp)
    }

    /// Shorten to `precision` digits. Never pads; zero precision is a no-op.
    #[must_use]
    pub fn round(self, precision: u32, mode: RoundingMode) -> Self {
        let precision = u64::from(precision);
        let digits = self.digits();
        if precision == 0 || digits <= precision {
            return self;
        }

        let dropped = digits - precision;
        let divisor = pow10(dropped);
        let (mut quotient, remainder) = self.coef.div_rem(&divisor);
        if rounds_away(&quotient, &remainder, &divisor, mode) {
            if self.coef.is_negative() {
                quotient -= BigInt::one();
            } else {
                quotient += BigInt::one();
            }
        }

        let exp = self.exp.saturating_add(to_i64(dropped).unwrap_or(i64::MAX));
        let mut rounded = Self::new(quotient, exp);
        // A carry such as 999 -> 1000 leaves one digit too many.
        if rounded.digits() > precision {
            rounded.coef /= BigInt::from(10u8);
            rounded.exp = rounded.exp.saturating_add(1);
        }
        rounded
    }

    /// Canonical to-scientific-string rendering.
    pub fn to_sci_string(&self) -> String {
        let digits = self.coef.magnitude().to_string();
        let len = to_i64(digits.len() as u64).unwrap_or(i64::MAX);
        let adjusted = self.exp.saturating_add(len - 1);

        let mut out = String::with_capacity(digits.len() + 8);
        if self.is_negative() {
            out.push('-');
        }

        if self.exp <= 0 && adjusted >= -6 {
            if self.exp == 0 {
                out.push_str(&digits);
            } else {
                let point = len + self.exp;
                if point > 0 {
                    let split = usize::try_from(point).unwrap_or(digits.len());
                    out.push_str(&digits[..split]);
                    out.push('.');
                    out.push_str(&digits[split..]);
                } else {
                    out.push_str("0.");
                    for _ in 0..-point {
                        out.push('0');
                    }
                    out.push_str(&digits);
                }
            }
        } else {
            out.push_str(&digits[..1]);
            if digits.len() > 1 {
                out.push('.');
                out.push_str(&digits[1..]);
            }
            out.push_str(&format!("E{adjusted:+}"));
        }
        out
    }
}

fn rounds_away(quotient: &BigInt, remainder: &BigInt, divisor: &BigInt, mode: RoundingMode) -> bool {
    if remainder.is_zero() {
        return false;
    }
    let twice = remainder.abs() + remainder.abs();
    match mode {
        RoundingMode::TowardZero => false,
        RoundingMode::NearestAwayFromZero => twice.cmp(divisor) != Ordering::Less,
        RoundingMode::NearestEven => match twice.cmp(divisor) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => quotient.is_odd(),
        },
    }
}

/// Numeric ordering; exponents only matter through magnitude.
pub(super) fn compare(a: &Parts, b: &Parts) -> Ordering {
    let rank = |sign: Sign| match sign {
        Sign::Minus => 0,
        Sign::NoSign => 1,
        Sign::Plus => 2,
    };
    let (sa, sb) = (a.coef.sign(), b.coef.sign());
    match rank(sa).cmp(&rank(sb)) {
        Ordering::Equal if sa == Sign::NoSign => return Ordering::Equal,
        Ordering::Equal => {}
        other => return other,
    }

    let magnitude = match a.adjusted().cmp(&b.adjusted()) {
        Ordering::Equal => {
            // Equal adjusted exponents bound the shift by the digit counts.
            let exp = a.exp.min(b.exp);
            let ca = a.coef.abs() * pow10(a.exp.abs_diff(exp));
            let cb = b.coef.abs() * pow10(b.exp.abs_diff(exp));
            ca.cmp(&cb)
        }
        other => other,
    };
    if sa == Sign::Minus {
        magnitude.reverse()
    } else {
        magnitude
    }
}

fn add_exact(a: &Parts, b: &Parts) -> EngineResult<Parts> {
    let exp = a.exp.min(b.exp);
    let ca = &a.coef * checked_pow10(a.exp.abs_diff(exp))?;
    let cb = &b.coef * checked_pow10(b.exp.abs_diff(exp))?;
    Ok(Parts::new(ca + cb, exp))
}

/// Sum, exact up to what a later rounding to `precision` can observe.
///
/// An addend entirely below the rounding position is replaced by a one-digit
/// stand-in with the same sign, so far-apart exponents are never aligned.
pub(super) fn add(a: &Parts, b: &Parts, precision: u32) -> EngineResult<Parts> {
    if precision > 0 && !a.is_zero() && !b.is_zero() {
        let (big, small) = if a.adjusted() >= b.adjusted() {
            (a, b)
        } else {
            (b, a)
        };
        let floor = big
            .exp
            .min(big.adjusted().saturating_sub(i64::from(precision)))
            .saturating_sub(1);
        if small.adjusted() < floor {
            let unit = if small.is_negative() {
                -BigInt::one()
            } else {
                BigInt::one()
            };
            return add_exact(big, &Parts::new(unit, floor - 1));
        }
    }
    add_exact(a, b)
}

pub(super) fn multiply(a: &Parts, b: &Parts) -> EngineResult<Parts> {
    let exp = a.exp.checked_add(b.exp).ok_or(EngineError::Overflow)?;
    Ok(Parts::new(&a.coef * &b.coef, exp))
}

/// Correctly rounded quotient. Exact quotients move toward the ideal
/// exponent `a.exp - b.exp`.
pub(super) fn divide(
    a: &Parts,
    b: &Parts,
    precision: u32,
    mode: RoundingMode,
) -> EngineResult<Parts> {
    if b.is_zero() {
        return Err(if a.is_zero() {
            EngineError::InvalidOperation("division undefined".to_string())
        } else {
            EngineError::DivisionByZero
        });
    }
    let ideal = a.exp.checked_sub(b.exp).ok_or(EngineError::Overflow)?;
    if a.is_zero() {
        return Ok(Parts::new(BigInt::zero(), ideal));
    }

    let negative = a.is_negative() != b.is_negative();
    let shift = (u64::from(precision) + b.digits() + 1).saturating_sub(a.digits());
    let dividend = a.coef.abs() * checked_pow10(shift)?;
    let (quotient, remainder) = dividend.div_rem(&b.coef.abs());
    let exp = ideal
        .checked_sub(to_i64(shift)?)
        .ok_or(EngineError::Overflow)?;

    let (coef, exp) = if remainder.is_zero() {
        strip_toward(quotient, exp, ideal)
    } else {
        sticky(quotient, exp)
    };
    let coef = if negative { -coef } else { coef };
    Ok(Parts::new(coef, exp).round(precision, mode))
}

/// Truncating remainder with exponent `min(a.exp, b.exp)`.
pub(super) fn remainder(a: &Parts, b: &Parts, precision: u32) -> EngineResult<Parts> {
    if b.is_zero() {
        return Err(EngineError::InvalidOperation(
            "remainder by zero".to_string(),
        ));
    }
    let exp = a.exp.min(b.exp);
    if a.is_zero() {
        return Ok(Parts::new(BigInt::zero(), exp));
    }
    if precision > 0
        && a.adjusted().saturating_sub(b.adjusted()) > i64::from(precision)
    {
        return Err(EngineError::DivisionImpossible);
    }

    let ca = &a.coef * checked_pow10(a.exp.abs_diff(exp))?;
    let cb = &b.coef * checked_pow10(b.exp.abs_diff(exp))?;
    let (quotient, rest) = ca.div_rem(&cb);
    if precision > 0 && digit_count(&quotient) > u64::from(precision) {
        return Err(EngineError::DivisionImpossible);
    }
    Ok(Parts::new(rest, exp))
}
