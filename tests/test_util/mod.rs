//! Shared test utilities for integration tests.
//!
//! These helpers mirror a subset of the `tokeval::test_util` module without
//! requiring the `test-support` feature, so integration tests compile against
//! the published library.

#![expect(
    dead_code,
    reason = "helpers are reused across multiple tests so some may be unused"
)]

use std::path::PathBuf;

use tokeval::{Expression, SyntaxError};

/// Absolute tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Assert that `actual` is within [`TOLERANCE`] of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Parse `src`, panicking with the source text on failure.
#[track_caller]
pub fn parse(src: &str) -> Expression {
    Expression::parse(src).unwrap_or_else(|e| panic!("parse '{src}': {e}"))
}

/// Parse and evaluate `src`.
#[track_caller]
pub fn eval(src: &str) -> f64 {
    parse(src)
        .value()
        .unwrap_or_else(|e| panic!("evaluate '{src}': {e}"))
}

/// Parse `src` and render its tree as an S-expression.
#[track_caller]
pub fn sexpr(src: &str) -> String {
    parse(src).to_sexpr()
}

/// Assert that parsing `src` fails with `expected`.
#[track_caller]
pub fn assert_parse_error(src: &str, expected: &SyntaxError) {
    match Expression::parse(src) {
        Ok(expr) => panic!("expected {expected:?} for '{src}', parsed {expr}"),
        Err(err) => assert_eq!(&err, expected, "wrong error for '{src}'"),
    }
}

/// Write `contents` to a file in the temporary directory unique to this
/// process and return its path.
pub fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tokeval-it-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}
