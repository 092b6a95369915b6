//! The calculator's numeric tower: arbitrary precision integers and doubles.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use super::error::EvalError;
use super::structures::Limits;

/// A value produced by the calculator.
///
/// Integers stay integers through addition, subtraction, multiplication,
/// floor division and non-negative powers. Anything touching a float,
/// and true division, produces a float.
#[derive(Debug, Clone)]
pub enum Number {
    /// An arbitrary precision integer.
    Int(BigInt),
    /// A 64-bit float.
    Float(f64)
}

/// Both operands, after promotion to a common representation.
enum Operands<'a> {
    Ints(&'a BigInt, &'a BigInt),
    Floats(f64, f64)
}

impl Number {
    /// Whether this is an integer.
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Converts the number to a float.
    ///
    /// # Errors
    /// Errors with [`EvalError::Overflow`] if an integer is too large to be represented.
    pub fn to_f64(&self) -> Result<f64, EvalError> {
        match self {
            Number::Int(int) => int_to_f64(int),
            Number::Float(float) => Ok(*float)
        }
    }

    /// Renders the number for display in a reply.
    /// Integers are printed as-is, floats with `precision` decimal places.
    #[must_use]
    pub fn format(&self, precision: usize) -> String {
        match self {
            Number::Int(int) => int.to_string(),
            Number::Float(float) if float.is_nan() => "nan".to_string(),
            Number::Float(float) if float.is_infinite() =>
                (if float.is_sign_positive() { "inf" } else { "-inf" }).to_string(),
            Number::Float(float) => format!("{float:.precision$}")
        }
    }

    fn promote<'a>(&'a self, other: &'a Number) -> Result<Operands<'a>, EvalError> {
        Ok(match (self, other) {
            (Number::Int(a), Number::Int(b)) => Operands::Ints(a, b),
            (a, b) => Operands::Floats(a.to_f64()?, b.to_f64()?)
        })
    }

    /// Negates the number.
    #[must_use]
    pub fn neg(&self) -> Number {
        match self {
            Number::Int(int) => Number::Int(-int),
            Number::Float(float) => Number::Float(-float)
        }
    }

    /// Adds two numbers.
    ///
    /// # Errors
    /// Errors if a promoted integer doesn't fit in a float, or the result is too large.
    pub fn add(&self, rhs: &Number, limits: &Limits) -> Result<Number, EvalError> {
        match self.promote(rhs)? {
            Operands::Ints(a, b) => limits.check_int(a + b),
            Operands::Floats(a, b) => Ok(Number::Float(a + b))
        }
    }

    /// Subtracts `rhs` from this number.
    ///
    /// # Errors
    /// Errors if a promoted integer doesn't fit in a float, or the result is too large.
    pub fn sub(&self, rhs: &Number, limits: &Limits) -> Result<Number, EvalError> {
        match self.promote(rhs)? {
            Operands::Ints(a, b) => limits.check_int(a - b),
            Operands::Floats(a, b) => Ok(Number::Float(a - b))
        }
    }

    /// Multiplies two numbers.
    ///
    /// # Errors
    /// Errors if a promoted integer doesn't fit in a float, or the result is too large.
    pub fn mul(&self, rhs: &Number, limits: &Limits) -> Result<Number, EvalError> {
        match self.promote(rhs)? {
            Operands::Ints(a, b) => {
                if a.bits() + b.bits() > limits.max_int_bits + 1 {
                    return Err(EvalError::TooLarge(limits.max_int_bits));
                }
                limits.check_int(a * b)
            },
            Operands::Floats(a, b) => Ok(Number::Float(a * b))
        }
    }

    /// Divides this number by `rhs`. Always produces a float.
    ///
    /// # Errors
    /// Errors on division by zero, or if the quotient doesn't fit in a float.
    pub fn div(&self, rhs: &Number) -> Result<Number, EvalError> {
        let (a, b) = match self.promote(rhs)? {
            Operands::Ints(a, b) => {
                if b.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                // Exact quotient first, so only the result has to fit in a float
                return BigRational::new(a.clone(), b.clone())
                    .to_f64()
                    .filter(|float| float.is_finite())
                    .map(Number::Float)
                    .ok_or(EvalError::Overflow);
            },
            Operands::Floats(a, b) => (a, b)
        };
        if b == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Number::Float(a / b))
    }

    /// Divides this number by `rhs`, rounding toward negative infinity.
    ///
    /// # Errors
    /// Errors on division by zero, or if a promoted integer doesn't fit in a float.
    pub fn floor_div(&self, rhs: &Number) -> Result<Number, EvalError> {
        match self.promote(rhs)? {
            Operands::Ints(a, b) => {
                if b.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Number::Int(a.div_floor(b)))
            },
            Operands::Floats(a, b) => float_floor_div(a, b).map(Number::Float)
        }
    }

    /// Raises this number to the power of `rhs`.
    ///
    /// # Errors
    /// Errors when raising zero to a negative power, when the result would be
    /// complex, or when it doesn't fit.
    pub fn pow(&self, rhs: &Number, limits: &Limits) -> Result<Number, EvalError> {
        match self.promote(rhs)? {
            Operands::Ints(base, exp) if !exp.is_negative() => int_pow(base, exp, limits),
            Operands::Ints(base, exp) => float_pow(int_to_f64(base)?, int_to_f64(exp)?),
            Operands::Floats(base, exp) => float_pow(base, exp)
        }
    }
}

fn int_to_f64(int: &BigInt) -> Result<f64, EvalError> {
    int.to_f64()
        .filter(|float| float.is_finite())
        .ok_or(EvalError::Overflow)
}

/// Converts an integral float into an integer, as `ceil`, `floor` and friends do.
pub(crate) fn f64_to_int(float: f64, name: &'static str) -> Result<BigInt, EvalError> {
    if float.is_nan() {
        return Err(EvalError::Domain(name));
    }
    BigInt::from_f64(float).ok_or(EvalError::Overflow)
}

fn int_pow(base: &BigInt, exp: &BigInt, limits: &Limits) -> Result<Number, EvalError> {
    // These never grow, no matter how large the exponent is
    if base.is_zero() || base.magnitude().bits() == 1 {
        let negative = base.is_negative() && exp.is_odd();
        return Ok(Number::Int(match (base.is_zero(), exp.is_zero()) {
            (true, false) => BigInt::zero(),
            (true, true) => BigInt::from(1),
            (false, _) if negative => BigInt::from(-1),
            (false, _) => BigInt::from(1)
        }));
    }
    let too_large = EvalError::TooLarge(limits.max_int_bits);
    let exp = exp.to_u32().ok_or(too_large)?;
    if (base.bits() - 1).saturating_mul(u64::from(exp)) > limits.max_int_bits {
        return Err(too_large);
    }
    limits.check_int(base.pow(exp))
}

fn float_pow(base: f64, exp: f64) -> Result<Number, EvalError> {
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base.is_finite() && base < 0.0 && exp.is_finite() && exp.fract() != 0.0 {
        return Err(EvalError::Domain("pow"));
    }
    let result = base.powf(exp);
    if result.is_infinite() && base.is_finite() && exp.is_finite() {
        return Err(EvalError::Overflow);
    }
    Ok(Number::Float(result))
}

fn float_floor_div(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    // Go through the remainder so that results land on the right side of an integer
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }
    if div == 0.0 {
        return Ok(0.0_f64.copysign(a / b));
    }
    let mut floored = div.floor();
    if div - floored > 0.5 {
        floored += 1.0;
    }
    Ok(floored)
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(int) => write!(f, "{int}"),
            Number::Float(_) => f.write_str(&self.format(4))
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    /// Compares numerically, so that `Int(4)` equals `Float(4.0)`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(b),
            (Number::Int(int), Number::Float(float)) => cmp_int_float(int, *float),
            (Number::Float(float), Number::Int(int)) =>
                cmp_int_float(int, *float).map(Ordering::reverse)
        }
    }
}

fn cmp_int_float(int: &BigInt, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float.is_infinite() {
        return Some(if float > 0.0 { Ordering::Less } else { Ordering::Greater });
    }
    // Compare against the floor exactly, then let the fraction break ties
    let floor = BigInt::from_f64(float.floor())?;
    Some(int.cmp(&floor).then(
        if float.fract() == 0.0 { Ordering::Equal } else { Ordering::Less }
    ))
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
