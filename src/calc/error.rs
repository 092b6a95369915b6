//! Everything that can go wrong while turning a line of text into a number.

use displaydoc::Display;
use thiserror::Error;

/// Something went wrong while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CalcError {
    #[displaydoc("illegal character {character:?} at column {column}")]
    /// A character that can't start any token.
    Lexical {
        /// The offending character.
        character: char,
        /// The 1-based column of the character.
        column: usize
    },
    #[displaydoc("syntax error at column {column}: {reason}")]
    /// The tokens don't form a valid expression, or use a name that isn't allow-listed.
    Syntax {
        /// The 1-based column where parsing stopped.
        column: usize,
        /// A short description of what was expected.
        reason: String
    },
    #[displaydoc("expression is too large: {0}")]
    /// The expression is bigger than the calculator is willing to handle.
    Limit(LimitError),
    #[displaydoc("{0}")]
    /// The expression parsed, but evaluating it failed.
    Evaluation(#[from] EvalError)
}

impl CalcError {
    /// Whether this error happened before any evaluation took place.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, CalcError::Evaluation(_))
    }
}

/// A numeric fault raised while evaluating a parsed expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Error)]
pub enum EvalError {
    /// division by zero
    DivisionByZero,
    #[displaydoc("math domain error in {0}")]
    /// An argument was outside of a function's domain.
    Domain(&'static str),
    /// numerical result out of range
    Overflow,
    #[displaydoc("integer result would exceed {0} bits")]
    /// An integer result would be larger than the configured limit.
    TooLarge(u64),
    #[displaydoc("{0} only accepts integers")]
    /// A function that only works on integers got a float.
    NotInteger(&'static str)
}

/// Which of the calculator's limits an expression went over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum LimitError {
    #[displaydoc("brackets are nested deeper than {0} levels")]
    /// Brackets nested too deeply.
    Depth(usize),
    #[displaydoc("more than {0} tokens")]
    /// Too many tokens in the expression.
    Tokens(usize)
}
