//! The allow-listed constants and math functions the calculator knows about.
//!
//! Names are enumerated explicitly; nothing is looked up dynamically.

use std::f64::consts;
use std::fmt::Formatter;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive};

use super::error::EvalError;
use super::number::{f64_to_int, Number};
use super::structures::Limits;

/// Holds runtime data about a name the calculator accepts.
/// Mostly useful for listing what's available.
#[derive(Debug, Clone, PartialEq)]
pub struct NameData<KIND: 'static> {
    /// The canonical item.
    pub kind: KIND,
    /// Every spelling that resolves to it.
    pub aliases: &'static [&'static str],
    /// What it does.
    pub description: &'static str,
    /// How many arguments it takes. Constants take none.
    pub arity: usize
}

// One table per kind of name, each with an enum, a lookup, and runtime data.
macro_rules! allow_list {
    (
        data_name: $dataname: ident,
        kind: $kind: ident,
        arity: $arity: literal,
        entries: [$({
            $name: ident,
            [ $($alias: literal),+ ],
            $description: literal
        }),* $(,)?]
    ) => {
        #[doc = concat!("Runtime data about every `", stringify!($kind), "`.")]
        pub static $dataname: [NameData<$kind>; allow_list!(count $($name)*)] = [
            $(
                NameData {
                    kind: $kind::$name,
                    aliases: &[ $($alias),+ ],
                    description: $description,
                    arity: $arity
                }
            ),*
        ];

        #[non_exhaustive]
        #[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
        #[allow(missing_docs)]
        #[doc = concat!("An allow-listed ", stringify!($kind), ".")]
        pub enum $kind {
            $(
                #[doc = $description]
                $name
            ),+
        }

        impl $kind {
            /// Looks up a name, if it's on the allow-list.
            #[must_use]
            pub fn from_name(name: &str) -> Option<$kind> {
                Some( match name {
                    $($($alias)|+ => $kind::$name,)+
                    _ => return None
                } )
            }

            /// The canonical spelling.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($kind::$name => allow_list!(first $($alias),+)),+
                }
            }
        }

        impl std::fmt::Display for $kind {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
    (count $tt: tt $($tts: tt)*) => {
        1 + allow_list!(count $($tts)*)
    };
    (count) => {0};
    (first $head: literal $(, $tail: literal)*) => { $head };
}

allow_list! {
    data_name: CONSTANT_DATA,
    kind: Constant,
    arity: 0,
    entries: [
        { E, ["e"], "Euler's number." },
        { Pi, ["pi"], "The ratio of a circle's circumference to its diameter." },
        { Tau, ["tau"], "Two pi." },
        { Inf, ["inf"], "Positive infinity." },
        { Nan, ["nan"], "Not a number." }
    ]
}

allow_list! {
    data_name: UNARY_FUNCTION_DATA,
    kind: UnaryFunction,
    arity: 1,
    entries: [
        { Abs, ["abs"], "Absolute value, keeping integers as integers." },
        { Acos, ["acos"], "Arc cosine, in radians." },
        { Acosh, ["acosh"], "Inverse hyperbolic cosine." },
        { Asin, ["asin"], "Arc sine, in radians." },
        { Asinh, ["asinh"], "Inverse hyperbolic sine." },
        { Atan, ["atan"], "Arc tangent, in radians." },
        { Ceil, ["ceil"], "Smallest integer not less than the argument." },
        { Cos, ["cos"], "Cosine of an angle in radians." },
        { Cosh, ["cosh"], "Hyperbolic cosine." },
        { Degrees, ["degrees"], "Converts radians to degrees." },
        { Erf, ["erf"], "The error function." },
        { Erfc, ["erfc"], "The complementary error function." },
        { Exp, ["exp"], "e raised to the argument." },
        { Expm1, ["expm1"], "exp(x) - 1, accurate near zero." },
        { Fabs, ["fabs"], "Absolute value, as a float." },
        { Factorial, ["factorial"], "Factorial of a non-negative integer." },
        { Floor, ["floor"], "Largest integer not greater than the argument." },
        { Gamma, ["gamma"], "The gamma function." },
        { Lgamma, ["lgamma"], "Natural log of the absolute value of the gamma function." },
        { Ln, ["ln", "log"], "Natural logarithm." },
        { Log10, ["log10"], "Base 10 logarithm." },
        { Log1p, ["log1p"], "ln(1 + x), accurate near zero." },
        { Log2, ["log2"], "Base 2 logarithm." },
        { Radians, ["radians"], "Converts degrees to radians." },
        { Sin, ["sin"], "Sine of an angle in radians." },
        { Sinh, ["sinh"], "Hyperbolic sine." },
        { Sqrt, ["sqrt"], "Square root." },
        { Tan, ["tan"], "Tangent of an angle in radians." },
        { Tanh, ["tanh"], "Hyperbolic tangent." },
        { Trunc, ["trunc"], "Rounds toward zero, to an integer." }
    ]
}

allow_list! {
    data_name: BINARY_FUNCTION_DATA,
    kind: BinaryFunction,
    arity: 2,
    entries: [
        { Atan2, ["atan2"], "Arc tangent of y / x, using the signs of both to pick the quadrant." },
        { Copysign, ["copysign"], "The magnitude of the first argument with the sign of the second." },
        { Fmod, ["fmod"], "Float remainder, with the sign of the dividend." },
        { Gcd, ["gcd"], "Greatest common divisor of two integers." },
        { Hypot, ["hypot"], "Euclidean norm, sqrt(x*x + y*y)." },
        { Logb, ["logb"], "Logarithm of the first argument in the base of the second." }
    ]
}

/// Anything a bare identifier can resolve to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// A constant.
    Constant(Constant),
    /// A one-argument function.
    Unary(UnaryFunction),
    /// A two-argument function.
    Binary(BinaryFunction)
}

impl Name {
    /// Resolves an identifier against every allow-list.
    #[must_use]
    pub fn resolve(ident: &str) -> Option<Name> {
        Constant::from_name(ident).map(Name::Constant)
            .or_else(|| UnaryFunction::from_name(ident).map(Name::Unary))
            .or_else(|| BinaryFunction::from_name(ident).map(Name::Binary))
    }

    /// How many arguments this name takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Name::Constant(_) => 0,
            Name::Unary(_) => 1,
            Name::Binary(_) => 2
        }
    }
}

impl Constant {
    /// The value of the constant.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Constant::E => consts::E,
            Constant::Pi => consts::PI,
            Constant::Tau => consts::TAU,
            Constant::Inf => f64::INFINITY,
            Constant::Nan => f64::NAN
        }
    }
}

/// Applies a float function, turning NaN and infinities that came out of
/// well-behaved inputs into errors.
fn math_1(
    name: &'static str,
    x: &Number,
    func: impl Fn(f64) -> f64,
    can_overflow: bool
) -> Result<Number, EvalError> {
    let x = x.to_f64()?;
    let result = func(x);
    if result.is_nan() && !x.is_nan() {
        return Err(EvalError::Domain(name));
    }
    if result.is_infinite() && x.is_finite() {
        return Err(if can_overflow { EvalError::Overflow } else { EvalError::Domain(name) });
    }
    Ok(Number::Float(result))
}

fn math_2(
    name: &'static str,
    x: &Number,
    y: &Number,
    func: impl Fn(f64, f64) -> f64
) -> Result<Number, EvalError> {
    let (x, y) = (x.to_f64()?, y.to_f64()?);
    let result = func(x, y);
    if result.is_nan() && !x.is_nan() && !y.is_nan() {
        return Err(EvalError::Domain(name));
    }
    if result.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(EvalError::Overflow);
    }
    Ok(Number::Float(result))
}

/// Takes a logarithm with `func`, which must be a logarithm in some base.
/// Integers too large for a float are split into a 64-bit mantissa and a power of two.
fn log(name: &'static str, x: &Number, func: fn(f64) -> f64) -> Result<f64, EvalError> {
    if let Number::Int(int) = x {
        if !int.is_positive() {
            return Err(EvalError::Domain(name));
        }
        if x.to_f64().is_err() {
            let shift = int.bits() - 64;
            let mantissa = (int >> shift).to_f64().ok_or(EvalError::Overflow)?;
            #[allow(clippy::cast_precision_loss)]
            let shift = shift as f64;
            return Ok(func(mantissa) + shift * func(2.0));
        }
    }
    let value = x.to_f64()?;
    let result = func(value);
    if !value.is_nan() && (result.is_nan() || (value.is_finite() && result.is_infinite())) {
        return Err(EvalError::Domain(name));
    }
    Ok(result)
}

fn round_to_int(
    name: &'static str,
    x: &Number,
    func: impl Fn(f64) -> f64
) -> Result<Number, EvalError> {
    Ok(match x {
        Number::Int(int) => Number::Int(int.clone()),
        Number::Float(float) => Number::Int(f64_to_int(func(*float), name)?)
    })
}

fn factorial(x: &Number, limits: &Limits) -> Result<Number, EvalError> {
    let n = match x {
        Number::Int(int) => int.clone(),
        Number::Float(float) if float.is_finite() && float.fract() == 0.0 =>
            f64_to_int(*float, "factorial")?,
        Number::Float(_) => return Err(EvalError::Domain("factorial"))
    };
    if n.is_negative() {
        return Err(EvalError::Domain("factorial"));
    }
    let too_large = EvalError::TooLarge(limits.max_int_bits);
    let n = n.to_u64().ok_or(too_large)?;
    let mut product = BigInt::from(1);
    for i in 2..=n {
        product *= i;
        if product.bits() > limits.max_int_bits {
            return Err(too_large);
        }
    }
    Ok(Number::Int(product))
}

fn gamma(x: &Number) -> Result<Number, EvalError> {
    let value = x.to_f64()?;
    // Poles at zero and the negative integers
    if value.is_finite() && value <= 0.0 && value.fract() == 0.0 {
        return Err(EvalError::Domain("gamma"));
    }
    math_1("gamma", x, libm::tgamma, true)
}

fn lgamma(x: &Number) -> Result<Number, EvalError> {
    let value = x.to_f64()?;
    if value.is_finite() && value <= 0.0 && value.fract() == 0.0 {
        return Err(EvalError::Domain("lgamma"));
    }
    math_1("lgamma", x, libm::lgamma, true)
}

impl UnaryFunction {
    /// Applies the function to a value.
    ///
    /// # Errors
    /// Errors if the value is outside of the function's domain, or the result doesn't fit.
    pub fn apply(self, x: &Number, limits: &Limits) -> Result<Number, EvalError> {
        use UnaryFunction as F;
        match self {
            F::Abs => Ok(match x {
                Number::Int(int) => Number::Int(int.abs()),
                Number::Float(float) => Number::Float(float.abs())
            }),
            F::Acos => math_1("acos", x, f64::acos, false),
            F::Acosh => math_1("acosh", x, f64::acosh, false),
            F::Asin => math_1("asin", x, f64::asin, false),
            F::Asinh => math_1("asinh", x, f64::asinh, false),
            F::Atan => math_1("atan", x, f64::atan, false),
            F::Ceil => round_to_int("ceil", x, f64::ceil),
            F::Cos => math_1("cos", x, f64::cos, false),
            F::Cosh => math_1("cosh", x, f64::cosh, true),
            F::Degrees => math_1("degrees", x, f64::to_degrees, true),
            F::Erf => math_1("erf", x, libm::erf, false),
            F::Erfc => math_1("erfc", x, libm::erfc, false),
            F::Exp => math_1("exp", x, f64::exp, true),
            F::Expm1 => math_1("expm1", x, f64::exp_m1, true),
            F::Fabs => math_1("fabs", x, f64::abs, false),
            F::Factorial => factorial(x, limits),
            F::Floor => round_to_int("floor", x, f64::floor),
            F::Gamma => gamma(x),
            F::Lgamma => lgamma(x),
            F::Ln => log("log", x, f64::ln).map(Number::Float),
            F::Log10 => log("log10", x, f64::log10).map(Number::Float),
            F::Log1p => math_1("log1p", x, f64::ln_1p, false),
            F::Log2 => log("log2", x, f64::log2).map(Number::Float),
            F::Radians => math_1("radians", x, f64::to_radians, false),
            F::Sin => math_1("sin", x, f64::sin, false),
            F::Sinh => math_1("sinh", x, f64::sinh, true),
            F::Sqrt => math_1("sqrt", x, f64::sqrt, false),
            F::Tan => math_1("tan", x, f64::tan, false),
            F::Tanh => math_1("tanh", x, f64::tanh, false),
            F::Trunc => round_to_int("trunc", x, f64::trunc)
        }
    }
}

impl BinaryFunction {
    /// Applies the function to two values.
    ///
    /// # Errors
    /// Errors if the values are outside of the function's domain, or the result doesn't fit.
    pub fn apply(self, x: &Number, y: &Number) -> Result<Number, EvalError> {
        use BinaryFunction as F;
        match self {
            F::Atan2 => math_2("atan2", x, y, f64::atan2),
            F::Copysign => math_2("copysign", x, y, f64::copysign),
            F::Fmod => math_2("fmod", x, y, |a, b| a % b),
            F::Gcd => match (x, y) {
                (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a.gcd(b))),
                _ => Err(EvalError::NotInteger("gcd"))
            },
            F::Hypot => math_2("hypot", x, y, f64::hypot),
            F::Logb => {
                let num = log("logb", x, f64::ln)?;
                let den = log("logb", y, f64::ln)?;
                if den == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Number::Float(num / den))
            }
        }
    }
}
