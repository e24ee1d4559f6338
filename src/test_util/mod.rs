//! Helpers for parsing expressions and asserting over results in tests.
//!
//! These functions reduce boilerplate when comparing floating-point results
//! and verifying that parsing failures report the expected [`SyntaxError`].
//!
//! [`SyntaxError`]: crate::SyntaxError

mod assertions;
mod expressions;

pub use assertions::{assert_close, assert_syntax_error, assert_value};
pub use expressions::{eval, eval_with, sexpr};

/// Absolute tolerance used by [`assert_close`].
pub const TOLERANCE: f64 = 1e-9;
