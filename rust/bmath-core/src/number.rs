//! Tagged numeric tower with promotion arithmetic.
//!
//! Every binary operation promotes monotonically along
//! `Int <= Real <= Complex`: any Complex operand yields Complex, otherwise
//! any Real yields Real, otherwise Int. Division always promotes to at
//! least Real. A Complex with a zero imaginary part never survives
//! construction — it collapses to Real, so zero stays canonical.

use crate::error::{ErrorKind, EvalError};
use crate::types::SimpleType;
use num_complex::Complex64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Real(f64),
    Complex(Complex64),
}

impl Number {
    /// Build a complex number, collapsing a zero imaginary part to Real.
    pub fn complex(re: f64, im: f64) -> Self {
        if im == 0.0 {
            Number::Real(re)
        } else {
            Number::Complex(Complex64::new(re, im))
        }
    }

    pub fn from_complex(c: Complex64) -> Self {
        Self::complex(c.re, c.im)
    }

    pub fn simple_type(&self) -> SimpleType {
        match self {
            Number::Int(_) => SimpleType::Integer,
            Number::Real(_) => SimpleType::Real,
            Number::Complex(_) => SimpleType::Complex,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Complex(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(n) => *n == 0,
            Number::Real(f) => *f == 0.0,
            Number::Complex(c) => c.is_zero(),
        }
    }

    /// Numeric value as f64. Only meaningful for non-complex numbers.
    fn as_real(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Real(f) => *f,
            Number::Complex(c) => c.re,
        }
    }

    fn as_complex(&self) -> Complex64 {
        match self {
            Number::Int(n) => Complex64::new(*n as f64, 0.0),
            Number::Real(f) => Complex64::new(*f, 0.0),
            Number::Complex(c) => *c,
        }
    }

    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_add(b)),
            (a, b) if a.is_complex() || b.is_complex() => {
                Self::from_complex(a.as_complex() + b.as_complex())
            }
            (a, b) => Number::Real(a.as_real() + b.as_real()),
        }
    }

    pub fn sub(self, other: Self) -> Self {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_sub(b)),
            (a, b) if a.is_complex() || b.is_complex() => {
                Self::from_complex(a.as_complex() - b.as_complex())
            }
            (a, b) => Number::Real(a.as_real() - b.as_real()),
        }
    }

    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_mul(b)),
            (a, b) if a.is_complex() || b.is_complex() => {
                Self::from_complex(a.as_complex() * b.as_complex())
            }
            (a, b) => Number::Real(a.as_real() * b.as_real()),
        }
    }

    /// Division promotes to at least Real; an exactly-zero divisor raises.
    pub fn div(self, other: Self) -> Result<Self, EvalError> {
        if other.is_zero() {
            return Err(EvalError::new(ErrorKind::ZeroDivision, "division by zero"));
        }
        if self.is_complex() || other.is_complex() {
            Ok(Self::from_complex(self.as_complex() / other.as_complex()))
        } else {
            Ok(Number::Real(self.as_real() / other.as_real()))
        }
    }

    /// Modulo. Real operands are rounded to the nearest integer before the
    /// integer modulo is taken; the result keeps the promoted kind.
    pub fn rem(self, other: Self) -> Result<Self, EvalError> {
        if self.is_complex() || other.is_complex() {
            return Err(EvalError::new(
                ErrorKind::ComplexModulus,
                "modulo is undefined for complex numbers",
            ));
        }
        let (a, real_result) = match self {
            Number::Int(n) => (n, false),
            n => (n.as_real().round() as i64, true),
        };
        let (b, real_divisor) = match other {
            Number::Int(n) => (n, false),
            n => (n.as_real().round() as i64, true),
        };
        if b == 0 {
            return Err(EvalError::new(ErrorKind::ZeroDivision, "modulo by zero"));
        }
        let r = a.wrapping_rem(b);
        if real_result || real_divisor {
            Ok(Number::Real(r as f64))
        } else {
            Ok(Number::Int(r))
        }
    }

    /// Exponentiation. An integer base with a negative integer exponent
    /// promotes to Real; integer overflow falls back to Real.
    pub fn pow(self, other: Self) -> Self {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) if b >= 0 => {
                match u32::try_from(b).ok().and_then(|e| a.checked_pow(e)) {
                    Some(r) => Number::Int(r),
                    None => Number::Real((a as f64).powf(b as f64)),
                }
            }
            (Number::Int(a), Number::Int(b)) => Number::Real((a as f64).powf(b as f64)),
            (a, b) if a.is_complex() || b.is_complex() => {
                Self::from_complex(a.as_complex().powc(b.as_complex()))
            }
            (a, b) => Number::Real(a.as_real().powf(b.as_real())),
        }
    }

    pub fn neg(self) -> Self {
        match self {
            Number::Int(n) => Number::Int(n.wrapping_neg()),
            Number::Real(f) => Number::Real(-f),
            Number::Complex(c) => Self::from_complex(-c),
        }
    }

    /// Square root; a negative Real produces a pure-imaginary Complex.
    pub fn sqrt(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.sqrt()),
            n => {
                let f = n.as_real();
                if f < 0.0 {
                    Self::complex(0.0, (-f).sqrt())
                } else {
                    Number::Real(f.sqrt())
                }
            }
        }
    }

    /// Absolute value; the magnitude for Complex.
    pub fn abs(self) -> Self {
        match self {
            Number::Int(n) => Number::Int(n.wrapping_abs()),
            Number::Real(f) => Number::Real(f.abs()),
            Number::Complex(c) => Number::Real(c.norm()),
        }
    }

    pub fn floor(self) -> Result<Self, EvalError> {
        match self {
            Number::Complex(_) => Err(Self::ceil_floor_round_error("floor")),
            Number::Int(n) => Ok(Number::Int(n)),
            Number::Real(f) => Ok(Number::Int(f.floor() as i64)),
        }
    }

    pub fn ceil(self) -> Result<Self, EvalError> {
        match self {
            Number::Complex(_) => Err(Self::ceil_floor_round_error("ceil")),
            Number::Int(n) => Ok(Number::Int(n)),
            Number::Real(f) => Ok(Number::Int(f.ceil() as i64)),
        }
    }

    pub fn round(self) -> Result<Self, EvalError> {
        match self {
            Number::Complex(_) => Err(Self::ceil_floor_round_error("round")),
            Number::Int(n) => Ok(Number::Int(n)),
            Number::Real(f) => Ok(Number::Int(f.round() as i64)),
        }
    }

    fn ceil_floor_round_error(op: &str) -> EvalError {
        EvalError::new(
            ErrorKind::ComplexCeilFloorRound,
            format!("{op} is undefined for complex numbers"),
        )
    }

    pub fn exp(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.exp()),
            n => Number::Real(n.as_real().exp()),
        }
    }

    /// Natural logarithm.
    pub fn ln(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.ln()),
            n => Number::Real(n.as_real().ln()),
        }
    }

    /// Logarithm in an arbitrary base, computed as ln(x) / ln(base).
    pub fn log_base(self, base: Self) -> Result<Self, EvalError> {
        let denom = base.ln();
        if denom.is_zero() {
            return Err(EvalError::new(
                ErrorKind::ZeroDivision,
                "logarithm base must not be 1",
            ));
        }
        self.ln().div(denom)
    }

    pub fn sin(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.sin()),
            n => Number::Real(n.as_real().sin()),
        }
    }

    pub fn cos(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.cos()),
            n => Number::Real(n.as_real().cos()),
        }
    }

    pub fn tan(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.tan()),
            n => Number::Real(n.as_real().tan()),
        }
    }

    pub fn cot(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.cos() / c.sin()),
            n => Number::Real(n.as_real().cos() / n.as_real().sin()),
        }
    }

    pub fn sec(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.cos().inv()),
            n => Number::Real(1.0 / n.as_real().cos()),
        }
    }

    pub fn csc(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.sin().inv()),
            n => Number::Real(1.0 / n.as_real().sin()),
        }
    }

    pub fn asin(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.asin()),
            n => Number::Real(n.as_real().asin()),
        }
    }

    pub fn acos(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.acos()),
            n => Number::Real(n.as_real().acos()),
        }
    }

    pub fn atan(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.atan()),
            n => Number::Real(n.as_real().atan()),
        }
    }

    pub fn sinh(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.sinh()),
            n => Number::Real(n.as_real().sinh()),
        }
    }

    pub fn cosh(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.cosh()),
            n => Number::Real(n.as_real().cosh()),
        }
    }

    pub fn tanh(self) -> Self {
        match self {
            Number::Complex(c) => Self::from_complex(c.tanh()),
            n => Number::Real(n.as_real().tanh()),
        }
    }

    pub fn re(self) -> Self {
        match self {
            Number::Complex(c) => Number::Real(c.re),
            n => n,
        }
    }

    pub fn im(self) -> Self {
        match self {
            Number::Int(_) => Number::Int(0),
            Number::Real(_) => Number::Real(0.0),
            Number::Complex(c) => Number::Real(c.im),
        }
    }

    /// Ordering comparison. Undefined for Complex.
    pub fn compare(self, other: Self) -> Result<Ordering, EvalError> {
        if self.is_complex() || other.is_complex() {
            return Err(EvalError::new(
                ErrorKind::ComplexComparison,
                "ordering is undefined for complex numbers",
            ));
        }
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Ok(a.cmp(&b)),
            (a, b) => Ok(a
                .as_real()
                .partial_cmp(&b.as_real())
                .unwrap_or(Ordering::Equal)),
        }
    }

    /// Equality after promotion; defined for all kinds.
    pub fn equals(self, other: Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) if a.is_complex() || b.is_complex() => a.as_complex() == b.as_complex(),
            (a, b) => a.as_real() == b.as_real(),
        }
    }
}

/// Format a float, dropping the fractional part when it is exactly zero.
fn fmt_real(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Real(r) => write!(f, "{}", fmt_real(*r)),
            Number::Complex(c) => {
                if c.re == 0.0 {
                    write!(f, "{}i", fmt_real(c.im))
                } else if c.im < 0.0 {
                    write!(f, "{}-{}i", fmt_real(c.re), fmt_real(-c.im))
                } else {
                    write!(f, "{}+{}i", fmt_real(c.re), fmt_real(c.im))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_is_monotone() {
        assert!(matches!(
            Number::Int(2).add(Number::Int(3)),
            Number::Int(5)
        ));
        assert!(matches!(
            Number::Int(2).add(Number::Real(0.5)),
            Number::Real(_)
        ));
        assert!(matches!(
            Number::Real(1.0).add(Number::complex(0.0, 1.0)),
            Number::Complex(_)
        ));
    }

    #[test]
    fn test_division_promotes_to_real() {
        assert!(matches!(
            Number::Int(4).div(Number::Int(2)).unwrap(),
            Number::Real(r) if r == 2.0
        ));
    }

    #[test]
    fn test_division_by_zero() {
        let err = Number::Int(1).div(Number::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_complex_collapses_on_zero_imaginary() {
        assert!(matches!(Number::complex(3.0, 0.0), Number::Real(r) if r == 3.0));
        let sum = Number::complex(1.0, 2.0).add(Number::complex(1.0, -2.0));
        assert!(matches!(sum, Number::Real(r) if r == 2.0));
    }

    #[test]
    fn test_modulo_rounds_reals() {
        // 7.4 rounds to 7 before the integer modulo.
        let r = Number::Real(7.4).rem(Number::Int(3)).unwrap();
        assert!(matches!(r, Number::Real(f) if f == 1.0));
        let r = Number::Int(7).rem(Number::Int(3)).unwrap();
        assert!(matches!(r, Number::Int(1)));
    }

    #[test]
    fn test_modulo_rejects_complex() {
        let err = Number::complex(1.0, 1.0).rem(Number::Int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ComplexModulus);
    }

    #[test]
    fn test_negative_power_promotes() {
        assert!(matches!(
            Number::Int(2).pow(Number::Int(-1)),
            Number::Real(r) if r == 0.5
        ));
        assert!(matches!(Number::Int(2).pow(Number::Int(10)), Number::Int(1024)));
    }

    #[test]
    fn test_sqrt_of_negative_real_is_complex() {
        let r = Number::Int(-4).sqrt();
        assert!(matches!(r, Number::Complex(c) if c.re == 0.0 && c.im == 2.0));
        assert_eq!(r.to_string(), "2i");
    }

    #[test]
    fn test_comparison_rejects_complex() {
        let err = Number::complex(0.0, 1.0).compare(Number::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ComplexComparison);
    }

    #[test]
    fn test_round_trip_display() {
        assert_eq!(Number::Int(14).to_string(), "14");
        assert_eq!(Number::Real(3.5).to_string(), "3.5");
        assert_eq!(Number::Real(3.0).to_string(), "3");
        assert_eq!(Number::complex(1.0, -2.0).to_string(), "1-2i");
    }

    #[test]
    fn test_cross_kind_equality() {
        assert!(Number::Int(3).equals(Number::Real(3.0)));
        assert!(Number::Real(3.0).equals(Number::complex(3.0, 0.0)));
        assert!(!Number::Int(3).equals(Number::complex(3.0, 1.0)));
    }

    #[test]
    fn test_floor_ceil_round() {
        assert!(matches!(Number::Real(2.7).floor().unwrap(), Number::Int(2)));
        assert!(matches!(Number::Real(2.1).ceil().unwrap(), Number::Int(3)));
        assert!(matches!(Number::Real(2.5).round().unwrap(), Number::Int(3)));
        assert_eq!(
            Number::complex(1.0, 1.0).floor().unwrap_err().kind,
            ErrorKind::ComplexCeilFloorRound
        );
    }
}
