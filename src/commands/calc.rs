//! The calculator command's reply.

use crate::calc::Calculator;
use crate::structures::{Color, Embed};

/// What the input line shows when nothing was given.
const NOTHING: &str = "(nothing)";

/// Evaluates an expression and lays out the result as an embed.
///
/// Failures are shown in the embed itself, colored red, so this never fails.
#[must_use]
pub fn report(calculator: &Calculator, expr: &str, precision: usize) -> Embed {
    let expr = expr.trim();
    let shown = if expr.is_empty() { NOTHING } else { expr };
    let (output, color) = match calculator.evaluate(expr) {
        Ok(number) => (number.format(precision), Color::TEAL),
        Err(err) => (format!("Error: {err}"), Color::RED)
    };
    let escaped = escape_markdown(shown);
    let lines: [&str; 5] = [
        "**Input:**",
        &escaped,
        "",
        "**Output:**",
        &output
    ];
    Embed::new("Calculator:", lines.join("\n"), color)
}

/// Escapes asterisks so they aren't read as emphasis.
fn escape_markdown(text: &str) -> String {
    text.replace('*', r"\*")
}
