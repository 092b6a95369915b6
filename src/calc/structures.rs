//! The parsed expression tree, its operators, and the limits evaluation runs under.

use std::fmt::{self, Display, Formatter};
use num_bigint::BigInt;

#[cfg(feature = "serde")]
use serde::Deserialize;

use super::error::EvalError;
use super::functions::{BinaryFunction, Constant, UnaryFunction};
use super::number::Number;

/// Bounds on how much work a single expression may ask for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct Limits {
    /// The deepest bracket nesting allowed.
    pub max_depth: usize,
    /// The most tokens an expression may have.
    pub max_tokens: usize,
    /// The largest integer result allowed, in bits.
    pub max_int_bits: u64
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 64,
            max_tokens: 256,
            max_int_bits: 1 << 16
        }
    }
}

impl Limits {
    /// Wraps an integer result, failing if it's over the size limit.
    ///
    /// # Errors
    /// Errors with [`EvalError::TooLarge`] if the integer has too many bits.
    pub fn check_int(&self, int: BigInt) -> Result<Number, EvalError> {
        if int.bits() > self.max_int_bits {
            return Err(EvalError::TooLarge(self.max_int_bits));
        }
        Ok(Number::Int(int))
    }
}

/// A prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos
}

/// An infix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Pow
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Pow => "**"
        })
    }
}

/// A parsed expression, with every name already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A number literal.
    Literal(Number),
    /// A named constant.
    Constant(Constant),
    /// A prefix operator applied to an expression.
    Unary(UnaryOp, Box<Expression>),
    /// An infix operator applied to two expressions.
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    /// A call to a one-argument function.
    Call(UnaryFunction, Box<Expression>),
    /// A call to a two-argument function.
    Call2(BinaryFunction, Box<Expression>, Box<Expression>)
}

impl Expression {
    /// Evaluates the expression.
    ///
    /// # Errors
    /// Errors on any numeric fault, see [`EvalError`].
    pub fn evaluate(&self, limits: &Limits) -> Result<Number, EvalError> {
        Ok(match self {
            Expression::Literal(number) => number.clone(),
            Expression::Constant(constant) => Number::Float(constant.value()),
            Expression::Unary(UnaryOp::Neg, operand) => operand.evaluate(limits)?.neg(),
            Expression::Unary(UnaryOp::Pos, operand) => operand.evaluate(limits)?,
            Expression::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(limits)?;
                let rhs = rhs.evaluate(limits)?;
                match op {
                    BinaryOp::Add => lhs.add(&rhs, limits)?,
                    BinaryOp::Sub => lhs.sub(&rhs, limits)?,
                    BinaryOp::Mul => lhs.mul(&rhs, limits)?,
                    BinaryOp::Div => lhs.div(&rhs)?,
                    BinaryOp::FloorDiv => lhs.floor_div(&rhs)?,
                    BinaryOp::Pow => lhs.pow(&rhs, limits)?
                }
            },
            Expression::Call(function, arg) => function.apply(&arg.evaluate(limits)?, limits)?,
            Expression::Call2(function, a, b) =>
                function.apply(&a.evaluate(limits)?, &b.evaluate(limits)?)?
        })
    }
}

impl Display for Expression {
    /// Writes the expression back out, fully parenthesized.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Number::Int(int)) => write!(f, "{int}"),
            Expression::Literal(Number::Float(float)) => write!(f, "{float:?}"),
            Expression::Constant(constant) => write!(f, "{constant}"),
            Expression::Unary(UnaryOp::Neg, operand) => write!(f, "-{operand}"),
            Expression::Unary(UnaryOp::Pos, operand) => write!(f, "+{operand}"),
            Expression::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Expression::Call(function, arg) => write!(f, "{function}({arg})"),
            Expression::Call2(function, a, b) => write!(f, "{function}({a}, {b})")
        }
    }
}
