//! Tests for expression parsing, variables and error reporting.

use rstest::{fixture, rstest};

use crate::error::SyntaxError;
use crate::parser::ast::Component;
use crate::parser::expression::Expression;
use crate::parser::functions::FunctionRegistry;
use crate::test_util::{assert_close, assert_syntax_error};
use crate::tokenizer::Cursor;

fn parse(src: &str) -> Expression {
    Expression::parse(src).unwrap_or_else(|e| panic!("'{src}': {e}"))
}

fn value(expr: &Expression) -> f64 {
    expr.value().unwrap_or_else(|e| panic!("{e}"))
}

#[fixture]
fn linear() -> Expression {
    parse("3x+2")
}

#[rstest]
fn variable_round_trip(mut linear: Expression) {
    assert_eq!(linear.variables(), ["x"]);
    assert_close(value(&linear), 2.0);
    assert!(linear.set_variable("x", 4.0));
    assert_close(value(&linear), 14.0);
    linear.set_variable("x", 0.0);
    assert_close(value(&linear), 2.0);
}

#[rstest]
fn rebinding_keeps_variable_set(mut linear: Expression) {
    linear.set_variable("x", 9.0);
    assert_eq!(linear.variables(), ["x"]);
    assert!(!linear.set_variable("y", 1.0));
    assert!(!linear.has_variable("y"));
}

#[test]
fn repeated_variable_is_bound_everywhere() {
    let mut expr = parse("x + x * (2 - x)");
    assert_eq!(expr.variables(), ["x"]);
    expr.set_variable("x", 3.0);
    // Left to right within a tier: x + (x * (2 - x)) = 3 + 3 * -1
    assert_close(value(&expr), 0.0);
}

#[test]
fn variables_in_order_of_first_appearance() {
    let expr = parse("b * a + root(c, a) - b");
    assert_eq!(expr.variables(), ["b", "a", "c"]);
}

#[rstest]
#[case("+5", 5.0)]
#[case("-5", -5.0)]
#[case("42", 42.0)]
#[case("1 + 2 * 3", 7.0)]
fn variable_free_input_folds_to_constant(#[case] src: &str, #[case] expected: f64) {
    let expr = parse(src);
    match expr.root() {
        Component::Constant(n) => assert_close(*n, expected),
        other => panic!("expected a constant, got {}", other.to_sexpr()),
    }
}

#[test]
fn unbound_variable_is_zero() {
    assert_close(value(&parse("7y")), 0.0);
}

#[test]
fn identifiers_take_digits_and_underscores() {
    let expr = parse("_rate2 * base_1");
    assert_eq!(expr.variables(), ["_rate2", "base_1"]);
}

#[rstest]
#[case("5 + ", SyntaxError::MissingTerm)]
#[case("", SyntaxError::MissingTerm)]
#[case("(5+2", SyntaxError::ExpectedChar(')'))]
#[case("5 )", SyntaxError::UnexpectedCharacter(')'))]
#[case("2(3)", SyntaxError::UnexpectedCharacter('('))]
#[case("3 x", SyntaxError::UnexpectedCharacter('x'))]
#[case("1 % 2", SyntaxError::UnexpectedCharacter('%'))]
#[case("1, 2", SyntaxError::UnexpectedCharacter(','))]
#[case("4 / (2 - 2)", SyntaxError::DivideByZero)]
#[case("1.2.3", SyntaxError::MultipleDecimalPoints)]
fn malformed_expressions(#[case] src: &str, #[case] expected: SyntaxError) {
    assert_syntax_error(src, &expected);
}

#[test]
fn division_by_zero_at_evaluation() {
    let mut expr = parse("1 / x");
    expr.set_variable("x", 0.0);
    assert_eq!(expr.value(), Err(SyntaxError::DivideByZero));
    expr.set_variable("x", 4.0);
    assert_eq!(expr.value(), Ok(0.25));
}

#[test]
fn from_cursor_stops_at_closing_delimiter() {
    let mut cursor = Cursor::from("x * 2) + 1");
    let expr = Expression::from_cursor(&mut cursor, FunctionRegistry::builtin())
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(expr.to_sexpr(), "(* x 2)");
    assert_eq!(cursor.peek(), Some(')'));
}

#[test]
fn display_matches_sexpr() {
    let expr = parse("2sin(t)");
    assert_eq!(expr.to_string(), "(* 2 (sin t))");
}
