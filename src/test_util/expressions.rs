//! Shortcuts for parsing and evaluating expressions in tests.

use crate::{Expression, FunctionRegistry};

/// Parse `src` with the built-in functions and evaluate it.
///
/// # Panics
/// Panics if parsing or evaluation fails.
#[must_use]
#[track_caller]
pub fn eval(src: &str) -> f64 {
    eval_with(src, FunctionRegistry::builtin())
}

/// Parse `src` against `registry` and evaluate it.
///
/// # Panics
/// Panics if parsing or evaluation fails.
#[must_use]
#[track_caller]
pub fn eval_with(src: &str, registry: &FunctionRegistry) -> f64 {
    Expression::parse_with(src, registry)
        .and_then(|expr| expr.value())
        .unwrap_or_else(|e| panic!("'{src}': {e}"))
}

/// Parse `src` and render its tree as an S-expression.
///
/// # Examples
///
/// ```
/// use tokeval::test_util::sexpr;
/// assert_eq!(sexpr("x + 2*y"), "(+ x (* 2 y))");
/// ```
///
/// # Panics
/// Panics if parsing fails.
#[must_use]
#[track_caller]
pub fn sexpr(src: &str) -> String {
    Expression::parse(src)
        .unwrap_or_else(|e| panic!("'{src}': {e}"))
        .to_sexpr()
}
