//! Handles parsing and evaluation of arithmetic expressions.
// The pest grammar file lives alongside this module.

use std::fmt::{Debug, Formatter};
use itertools::Itertools;
use once_cell::sync::Lazy;
use pest::error::{Error, ErrorVariant, InputLocation};
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;

mod error;
mod functions;
mod number;
mod structures;

pub use error::{CalcError, EvalError, LimitError};
pub use functions::{
    BinaryFunction, Constant, Name, NameData, UnaryFunction,
    BINARY_FUNCTION_DATA, CONSTANT_DATA, UNARY_FUNCTION_DATA
};
pub use number::Number;
pub use structures::{BinaryOp, Expression, Limits, UnaryOp};

mod grammar {
    #![allow(missing_docs)]

    use std::fmt::{Display, Formatter};
    use pest_derive::Parser;
    #[derive(Parser)]
    #[grammar = "calc/calc.pest"]
    pub struct Parser;

    impl Display for Rule {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", match self {
                Rule::expr | Rule::calculation => "an expression",
                Rule::float | Rule::integer => "a number",
                Rule::ident => "a name",
                Rule::call => "a function call",
                Rule::group => "a bracketed expression",
                Rule::args => "a list of arguments",
                Rule::add | Rule::sub | Rule::pow | Rule::mul | Rule::floor_div | Rule::div
                    => "an operator",
                Rule::neg | Rule::pos => "a sign",
                Rule::close_paren => "`)`",
                Rule::close_bracket => "`]`",
                Rule::close_brace => "`}`",
                Rule::comma => "`,`",
                Rule::EOI => "the end of the input",
                _ => "<internal token>"
            })
        }
    }
}
use grammar::Rule;

/// The characters skipped between tokens.
const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\u{0C}', '`'];

/// A calculator, holding the operator table and the limits it enforces.
///
/// This has no mutable state, so one instance can be shared between any number of callers.
pub struct Calculator {
    pratt: PrattParser<Rule>,
    limits: Limits
}

impl Debug for Calculator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new(Limits::default())
    }
}

static DEFAULT_CALCULATOR: Lazy<Calculator> = Lazy::new(Calculator::default);

/// Evaluates an expression with the default [`Calculator`].
///
/// # Errors
/// Errors if the expression fails to parse or evaluate. See [`CalcError`].
pub fn evaluate(expr: &str) -> Result<Number, CalcError> {
    DEFAULT_CALCULATOR.evaluate(expr)
}

impl Calculator {
    /// Creates a calculator enforcing the given limits.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        // Lowest precedence first
        let pratt = PrattParser::new()
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left)
                | Op::infix(Rule::div, Assoc::Left)
                | Op::infix(Rule::floor_div, Assoc::Left))
            .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
            .op(Op::infix(Rule::pow, Assoc::Right));
        Calculator { pratt, limits }
    }

    /// The limits this calculator enforces.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parses and evaluates an expression.
    ///
    /// # Errors
    /// Errors if the expression fails to parse or evaluate. See [`CalcError`].
    pub fn evaluate(&self, expr: &str) -> Result<Number, CalcError> {
        let expression = self.parse(expr)?;
        let result = expression.evaluate(&self.limits);
        tracing::debug!(%expression, ?result, "evaluated");
        Ok(result?)
    }

    /// Parses an expression without evaluating it.
    ///
    /// # Errors
    /// Errors if the expression contains an illegal character, goes over a limit,
    /// doesn't fit the grammar, or uses an unknown name.
    #[allow(clippy::missing_panics_doc)]
    pub fn parse(&self, expr: &str) -> Result<Expression, CalcError> {
        self.lex(expr)?;
        let mut pairs = grammar::Parser::parse(Rule::calculation, expr)
            .map_err(|err| syntax_error(expr, &err))?;
        // The grammar guarantees exactly one top-level expression
        let root = pairs.next().expect("calculation always contains an expression");
        self.build(root.into_inner())
    }

    /// Runs the token stream over the input, catching stray characters
    /// and anything over the size limits before the real parse.
    fn lex(&self, expr: &str) -> Result<(), CalcError> {
        let tokens = grammar::Parser::parse(Rule::tokens, expr)
            .map_err(|err| syntax_error(expr, &err))?
            .next()
            .map(Pair::into_inner);
        let Some(tokens) = tokens else {
            return Ok(());
        };

        let mut end = 0;
        let mut count = 0;
        let mut depth = 0usize;
        for token in tokens {
            end = token.as_span().end();
            count += 1;
            if count > self.limits.max_tokens {
                return Err(CalcError::Limit(LimitError::Tokens(self.limits.max_tokens)));
            }
            match token.as_rule() {
                Rule::open => {
                    depth += 1;
                    if depth > self.limits.max_depth {
                        return Err(CalcError::Limit(LimitError::Depth(self.limits.max_depth)));
                    }
                },
                Rule::close => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        let rest = &expr[end..];
        let skipped = rest.len() - rest.trim_start_matches(WHITESPACE).len();
        match rest[skipped..].chars().next() {
            Some(character) => Err(CalcError::Lexical {
                character,
                column: column_of(expr, end + skipped)
            }),
            None => Ok(())
        }
    }

    /// Folds the pairs of an `expr` into an [`Expression`], resolving names as it goes.
    fn build(&self, pairs: Pairs<Rule>) -> Result<Expression, CalcError> {
        self.pratt
            .map_primary(|primary| self.build_primary(primary))
            .map_prefix(|op, operand| {
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    Rule::pos => UnaryOp::Pos,
                    rule => unreachable!("{rule:?} is not a prefix operator")
                };
                Ok(Expression::Unary(op, Box::new(operand?)))
            })
            .map_infix(|lhs, op, rhs| {
                let op = match op.as_rule() {
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul => BinaryOp::Mul,
                    Rule::div => BinaryOp::Div,
                    Rule::floor_div => BinaryOp::FloorDiv,
                    Rule::pow => BinaryOp::Pow,
                    rule => unreachable!("{rule:?} is not an infix operator")
                };
                Ok(Expression::Binary(op, Box::new(lhs?), Box::new(rhs?)))
            })
            .parse(pairs)
    }

    fn build_primary(&self, primary: Pair<Rule>) -> Result<Expression, CalcError> {
        let column = primary.line_col().1;
        match primary.as_rule() {
            Rule::integer => Ok(Expression::Literal(Number::Int(
                primary.as_str().parse().map_err(|_| CalcError::Syntax {
                    column,
                    reason: format!("`{}` is not a valid integer", primary.as_str())
                })?
            ))),
            Rule::float => Ok(Expression::Literal(Number::Float(
                primary.as_str().parse().map_err(|_| CalcError::Syntax {
                    column,
                    reason: format!("`{}` is not a valid number", primary.as_str())
                })?
            ))),
            Rule::ident => match resolve(primary.as_str(), column)? {
                Name::Constant(constant) => Ok(Expression::Constant(constant)),
                name => Err(CalcError::Syntax {
                    column,
                    reason: format!("{} needs {} in brackets", primary.as_str(), arguments(name.arity()))
                })
            },
            Rule::group => {
                let inner = primary.into_inner().next()
                    .expect("groups always contain an expression");
                self.build(inner.into_inner())
            },
            Rule::call => {
                let mut inner = primary.into_inner();
                let ident = inner.next().expect("calls always start with a name");
                let args = inner.next().expect("calls always have arguments")
                    .into_inner()
                    .filter(|pair| pair.as_rule() == Rule::expr)
                    .map(|pair| self.build(pair.into_inner()))
                    .collect::<Result<Vec<_>, _>>()?;
                call(ident.as_str(), column, args)
            },
            rule => unreachable!("{rule:?} is not a primary expression")
        }
    }
}

/// Looks a name up in the allow-lists. Anything else is rejected like any other bad token.
fn resolve(ident: &str, column: usize) -> Result<Name, CalcError> {
    Name::resolve(ident).ok_or_else(|| CalcError::Syntax {
        column,
        reason: format!("unknown name `{ident}`")
    })
}

fn arguments(count: usize) -> String {
    match count {
        1 => "1 argument".to_string(),
        n => format!("{n} arguments")
    }
}

fn call(ident: &str, column: usize, args: Vec<Expression>) -> Result<Expression, CalcError> {
    let name = resolve(ident, column)?;
    let found = args.len();
    let mut args = args.into_iter().map(Box::new);
    match (name, args.next(), args.next(), args.next()) {
        (Name::Unary(function), Some(x), None, None) => Ok(Expression::Call(function, x)),
        (Name::Binary(function), Some(x), Some(y), None) => Ok(Expression::Call2(function, x, y)),
        (Name::Constant(_), ..) => Err(CalcError::Syntax {
            column,
            reason: format!("{ident} is a constant, not a function")
        }),
        _ => Err(CalcError::Syntax {
            column,
            reason: format!("{ident} takes {} but {found} were given", arguments(name.arity()))
        })
    }
}

/// Converts a byte offset into a 1-based column.
fn column_of(expr: &str, offset: usize) -> usize {
    expr[..offset].chars().count() + 1
}

/// Formats a pest error into a one-line syntax error.
fn syntax_error(expr: &str, error: &Error<Rule>) -> CalcError {
    let offset = match error.location {
        InputLocation::Pos(pos) | InputLocation::Span((pos, _)) => pos
    };
    let column = column_of(expr, offset);
    let found = match expr[offset..].chars().next() {
        Some(character) => format!("unexpected {character:?}"),
        None => "unexpected end of input".to_string()
    };
    let ErrorVariant::ParsingError { positives, .. } = &error.variant else {
        return CalcError::Syntax { column, reason: found };
    };
    let mut needed = positives
        .iter()
        .map(ToString::to_string)
        .filter(|name| name != "<internal token>")
        .unique()
        .collect::<Vec<String>>();
    let reason = match needed.len() {
        0 => found,
        1 => format!("{found}, expected {}", needed[0]),
        2 => format!("{found}, expected {} or {}", needed[0], needed[1]),
        _ => {
            let last = needed.pop().unwrap_or_default();
            format!("{found}, expected {}, or {last}", needed.join(", "))
        }
    };
    CalcError::Syntax { column, reason }
}
