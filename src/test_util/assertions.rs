//! Assertion helpers for numeric results and parse failures.

use super::TOLERANCE;
use crate::{Expression, SyntaxError};

/// Assert that `actual` is within [`TOLERANCE`] of `expected`.
///
/// # Examples
///
/// ```
/// use tokeval::test_util::assert_close;
/// assert_close(0.1 + 0.2, 0.3);
/// ```
///
/// # Panics
/// Panics if the difference exceeds the tolerance.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Parse `src` and assert that it evaluates close to `expected`.
///
/// # Panics
/// Panics if parsing or evaluation fails, or the value differs.
#[track_caller]
pub fn assert_value(src: &str, expected: f64) {
    let expr = Expression::parse(src).unwrap_or_else(|e| panic!("parse '{src}': {e}"));
    let actual = expr
        .value()
        .unwrap_or_else(|e| panic!("evaluate '{src}': {e}"));
    assert_close(actual, expected);
}

/// Assert that parsing `src` fails with exactly `expected`.
///
/// # Examples
///
/// ```
/// use tokeval::{SyntaxError, test_util::assert_syntax_error};
/// assert_syntax_error("(1 + 2", &SyntaxError::ExpectedChar(')'));
/// ```
///
/// # Panics
/// Panics if `src` parses or fails with a different error.
#[track_caller]
pub fn assert_syntax_error(src: &str, expected: &SyntaxError) {
    match Expression::parse(src) {
        Ok(expr) => panic!("expected {expected:?} for '{src}', parsed {}", expr.to_sexpr()),
        Err(err) => assert_eq!(&err, expected, "wrong error for '{src}'"),
    }
}
