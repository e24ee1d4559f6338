//! Arithmetic expression parser.
//!
//! Provides [`Expression`], a parsed expression whose variables can be
//! rebound and re-evaluated. Parsing proceeds one precedence tier at a time:
//! [`tiers`] drives the operator loop, and [`term`] reads numbers, variables,
//! groups and function calls. Operands with no free variables are folded into
//! constants as soon as they are combined, so a variable-free expression
//! parses to a single number.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/' | '^') factor)*
//! factor := '(' expr ')' | [number] [identifier ['(' expr (',' expr)* ')']]
//! ```
//!
//! Nesting depth is limited only by the stack.

mod term;
mod tiers;

use std::fmt;

use log::debug;

use crate::error::{Error, SyntaxError};
use crate::parser::ast::Component;
use crate::parser::functions::FunctionRegistry;
use crate::source::SourceResolver;
use crate::tokenizer::Cursor;

use tiers::TierParser;

/// A parsed expression with rebindable variables.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Component,
}

impl Expression {
    /// Parse `src` against the built-in functions.
    ///
    /// The whole input must be consumed.
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] describing the first malformed construct.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tokeval::Expression;
    ///
    /// let mut expr = Expression::parse("3x + 2").unwrap_or_else(|e| panic!("{e}"));
    /// assert_eq!(expr.variables(), ["x"]);
    /// expr.set_variable("x", 4.0);
    /// assert_eq!(expr.value(), Ok(14.0));
    /// ```
    pub fn parse(src: &str) -> Result<Self, SyntaxError> {
        Self::parse_with(src, FunctionRegistry::builtin())
    }

    /// Parse `src` using the functions in `registry`.
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] for malformed input, including trailing
    /// characters after a complete expression.
    pub fn parse_with(src: &str, registry: &FunctionRegistry) -> Result<Self, SyntaxError> {
        let mut cursor = Cursor::from(src);
        let expr = Self::from_cursor(&mut cursor, registry)?;
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(ch) => Err(SyntaxError::UnexpectedCharacter(ch)),
            None => Ok(expr),
        }
    }

    /// Parse one expression from `cursor`.
    ///
    /// Stops before a `)` or `,` that does not belong to the expression, so
    /// an enclosing grammar can continue from there.
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] for malformed input.
    pub fn from_cursor(cursor: &mut Cursor, registry: &FunctionRegistry) -> Result<Self, SyntaxError> {
        let root = TierParser::new(cursor, registry).parse_expr()?;
        debug!("parsed expression {}", root.to_sexpr());
        Ok(Self { root })
    }

    /// Read and parse the expression stored at `location`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the location cannot be opened
    /// and [`Error::Syntax`] if its contents do not parse.
    pub fn open(
        location: &str,
        resolver: &SourceResolver,
        registry: &FunctionRegistry,
    ) -> Result<Self, Error> {
        let mut cursor = Cursor::open(location, resolver)?;
        let expr = Self::from_cursor(&mut cursor, registry)?;
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(ch) => Err(SyntaxError::UnexpectedCharacter(ch).into()),
            None => Ok(expr),
        }
    }

    /// Distinct free variables in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        self.root.variables()
    }

    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.root.has_variable(name)
    }

    /// Bind every occurrence of `name` to `value`.
    ///
    /// Returns `false` when the expression does not mention `name`.
    pub fn set_variable(&mut self, name: &str, value: f64) -> bool {
        self.root.set_variable(name, value)
    }

    /// Evaluate with the current variable bindings.
    ///
    /// # Errors
    /// Returns [`SyntaxError::DivideByZero`] if evaluation divides by zero.
    pub fn value(&self) -> Result<f64, SyntaxError> {
        self.root.value()
    }

    #[must_use]
    pub fn root(&self) -> &Component {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Component {
        self.root
    }

    /// Display the expression as an S-expression.
    #[must_use]
    pub fn to_sexpr(&self) -> String {
        self.root.to_sexpr()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root.to_sexpr())
    }
}
