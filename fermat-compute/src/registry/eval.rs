//! Numeric evaluators for the standard operations.
//!
//! Integer arithmetic stays exact while it can: sums, differences, products, exact quotients, and
//! non-negative integer powers of integers produce integers, falling back to reals on overflow.
//! Every other combination produces a real. Results that are not finite are rejected.

use crate::{
    error::{DivisionByZero, Error, NonFiniteResult},
    operand::Number,
};

/// Checks that a real result is finite.
fn finite(symbol: &'static str, value: f64) -> Result<Number, Error> {
    if value.is_finite() {
        Ok(Number::Real(value))
    } else {
        Err(Error::spanless(NonFiniteResult { symbol }))
    }
}

/// Applies the checked integer operation if both operands are integers, otherwise (or on
/// overflow) applies the real operation.
fn arith(
    symbol: &'static str,
    a: Number,
    b: Number,
    int: fn(i64, i64) -> Option<i64>,
    real: fn(f64, f64) -> f64,
) -> Result<Number, Error> {
    if let (Number::Integer(a), Number::Integer(b)) = (a, b) {
        if let Some(n) = int(a, b) {
            return Ok(Number::Integer(n));
        }
    }

    finite(symbol, real(a.to_f64(), b.to_f64()))
}

/// `a + b`
pub fn add(a: Number, b: Number) -> Result<Number, Error> {
    arith("+", a, b, i64::checked_add, |a, b| a + b)
}

/// `a - b`
pub fn sub(a: Number, b: Number) -> Result<Number, Error> {
    arith("-", a, b, i64::checked_sub, |a, b| a - b)
}

/// `a * b`
pub fn mul(a: Number, b: Number) -> Result<Number, Error> {
    arith("*", a, b, i64::checked_mul, |a, b| a * b)
}

/// `a / b`
pub fn div(a: Number, b: Number) -> Result<Number, Error> {
    if b.is_zero() {
        return Err(Error::spanless(DivisionByZero { symbol: "/" }));
    }

    arith(
        "/",
        a,
        b,
        |a, b| if a.checked_rem(b)? == 0 { a.checked_div(b) } else { None },
        |a, b| a / b,
    )
}

/// `a ^ b`
pub fn pow(a: Number, b: Number) -> Result<Number, Error> {
    if a.is_zero() && b.is_negative() {
        return Err(Error::spanless(DivisionByZero { symbol: "^" }));
    }

    arith(
        "^",
        a,
        b,
        |a, b| a.checked_pow(u32::try_from(b).ok()?),
        f64::powf,
    )
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    use Number::{Integer, Real};

    #[test]
    fn integer_arithmetic_stays_exact() {
        assert_eq!(add(Integer(2), Integer(3)).unwrap(), Integer(5));
        assert_eq!(sub(Integer(2), Integer(6)).unwrap(), Integer(-4));
        assert_eq!(mul(Integer(-4), Integer(6)).unwrap(), Integer(-24));
        assert_eq!(div(Integer(6), Integer(2)).unwrap(), Integer(3));
        assert_eq!(pow(Integer(5), Integer(3)).unwrap(), Integer(125));
    }

    #[test]
    fn inexact_results_are_real() {
        assert_eq!(div(Integer(1), Integer(4)).unwrap(), Real(0.25));
        assert_eq!(pow(Integer(2), Integer(-1)).unwrap(), Real(0.5));
        assert_eq!(add(Integer(1), Real(0.5)).unwrap(), Real(1.5));
    }

    #[test]
    fn overflow_falls_back_to_real() {
        let Real(r) = mul(Integer(i64::MAX), Integer(2)).unwrap() else {
            panic!("expected a real result");
        };
        assert_float_absolute_eq!(r, 1.8446744073709552e19, 1e4);

        assert!(matches!(pow(Integer(10), Integer(30)).unwrap(), Real(_)));
        assert!(matches!(div(Integer(i64::MIN), Integer(-1)).unwrap(), Real(_)));
    }

    #[test]
    fn division_by_zero() {
        assert!(div(Integer(1), Integer(0)).unwrap_err().is::<DivisionByZero>());
        assert!(div(Real(1.0), Real(0.0)).unwrap_err().is::<DivisionByZero>());
        assert!(pow(Integer(0), Integer(-2)).unwrap_err().is::<DivisionByZero>());
        assert_eq!(pow(Integer(0), Integer(0)).unwrap(), Integer(1));
    }

    #[test]
    fn non_finite() {
        assert!(pow(Integer(-8), Real(0.5)).unwrap_err().is::<NonFiniteResult>());
        assert!(mul(Real(f64::MAX), Real(2.0)).unwrap_err().is::<NonFiniteResult>());
    }
}
