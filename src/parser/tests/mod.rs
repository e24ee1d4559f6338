//! Tests for the literal grammar, function registry and expression parser.

mod expression;
