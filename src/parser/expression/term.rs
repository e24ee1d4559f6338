//! Terms: the operands of the high tier.
//!
//! A term is a parenthesised group, or an optional coefficient followed by an
//! optional identifier. An identifier followed by `(`, with or without
//! whitespace in between, is a function call.

use crate::error::SyntaxError;
use crate::parser::ast::{Component, FunctionCall, Variable};
use crate::parser::literal::parse_number;

use super::tiers::TierParser;

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl TierParser<'_> {
    pub(super) fn parse_term(&mut self) -> Result<Component, SyntaxError> {
        if self.cursor.is_next('(') {
            let inner = self.parse_expr()?;
            if !self.cursor.is_next(')') {
                return Err(SyntaxError::ExpectedChar(')'));
            }
            return Ok(Component::Group(Box::new(inner)));
        }

        let coefficient = parse_number(self.cursor, false)?;
        let name = self.parse_identifier();

        match (coefficient, name) {
            (coefficient, Some(name)) if self.cursor.is_next('(') => {
                self.parse_call(&name, coefficient)
            }
            (coefficient, Some(name)) => Ok(Variable::new(name, coefficient).into()),
            (Some(n), None) => Ok(Component::Constant(n)),
            (None, None) => Err(SyntaxError::MissingTerm),
        }
    }

    /// Greedily read `[A-Za-z_][A-Za-z0-9_]*` with no leading whitespace.
    fn parse_identifier(&mut self) -> Option<String> {
        if !self.cursor.peek().is_some_and(is_ident_start) {
            return None;
        }
        let mut name = String::new();
        while let Some(ch) = self.cursor.peek().filter(|c| is_ident_continue(*c)) {
            name.push(ch);
            self.cursor.pop();
        }
        Some(name)
    }

    /// Parse the arguments of a call whose `(` has been consumed.
    fn parse_call(
        &mut self,
        name: &str,
        coefficient: Option<f64>,
    ) -> Result<Component, SyntaxError> {
        let function = self
            .registry
            .lookup(name)
            .cloned()
            .ok_or_else(|| SyntaxError::UnknownFunction(name.to_string()))?;

        let mut args = vec![self.parse_expr()?];
        while self.cursor.is_next(',') {
            args.push(self.parse_expr()?);
        }
        if !self.cursor.is_next(')') {
            return Err(SyntaxError::ExpectedChar(')'));
        }
        function.check_arity(args.len())?;
        Ok(FunctionCall::new(function, args, coefficient).into())
    }
}
