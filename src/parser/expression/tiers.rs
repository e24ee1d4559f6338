//! Tier-by-tier expression parser.
//!
//! [`TierParser::parse_tier`] reads operands joined by the operators of one
//! [`Tier`]. At the low tier each operand is itself a high-tier parse, and at
//! the high tier each operand is a term (see [`super::term`]). An operator of
//! the other tier ends the loop and is left for the caller.

use crate::error::SyntaxError;
use crate::parser::ast::{Component, Composite, Operator, Tier};
use crate::parser::functions::FunctionRegistry;
use crate::tokenizer::Cursor;

pub(super) struct TierParser<'a> {
    pub(super) cursor: &'a mut Cursor,
    pub(super) registry: &'a FunctionRegistry,
}

impl<'a> TierParser<'a> {
    pub(super) fn new(cursor: &'a mut Cursor, registry: &'a FunctionRegistry) -> Self {
        Self { cursor, registry }
    }

    /// Parse a complete expression, starting at the loosest tier.
    pub(super) fn parse_expr(&mut self) -> Result<Component, SyntaxError> {
        self.parse_tier(Tier::Low)
    }

    fn parse_unit(&mut self, tier: Tier) -> Result<Component, SyntaxError> {
        self.cursor.skip_whitespace();
        match tier {
            Tier::Low => self.parse_tier(Tier::High),
            Tier::High => self.parse_term(),
        }
    }

    pub(super) fn parse_tier(&mut self, tier: Tier) -> Result<Component, SyntaxError> {
        let mut first = self.parse_unit(tier)?;
        let mut composite: Option<Composite> = None;

        while let Some(op) = self.next_operator(tier)? {
            self.cursor.pop();
            let operand = self.parse_unit(tier)?;
            match composite.as_mut() {
                Some(c) => c.push(op, operand),
                None if first.is_constant() && operand.is_constant() => {
                    first = Component::Constant(op.apply(first.value()?, operand.value()?)?);
                }
                None => {
                    let mut c =
                        Composite::new(std::mem::replace(&mut first, Component::Constant(0.0)));
                    c.push(op, operand);
                    composite = Some(c);
                }
            }
        }

        Ok(composite.map_or(first, Component::Composite))
    }

    /// Peek at the operator that continues this tier, if any.
    ///
    /// End of input, a closing delimiter, or an operator of the other tier
    /// end the tier. Any other character is an error.
    fn next_operator(&mut self, tier: Tier) -> Result<Option<Operator>, SyntaxError> {
        self.cursor.skip_whitespace();
        let Some(ch) = self.cursor.peek() else {
            return Ok(None);
        };
        match Operator::from_char(ch) {
            Some(op) if op.tier() == tier => Ok(Some(op)),
            Some(_) => Ok(None),
            None if matches!(ch, ')' | ',') => Ok(None),
            None => Err(SyntaxError::UnexpectedCharacter(ch)),
        }
    }
}
