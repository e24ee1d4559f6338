//! Operator table for arithmetic expressions.
//!
//! Operators fall into two [`Tier`]s. The parser handles one tier per
//! recursion level, so an operator of the other tier is simply left in the
//! input for the enclosing level; that is all precedence amounts to. Each
//! operator also records the function that undoes it, for callers that solve
//! for an operand.

use crate::error::SyntaxError;
use crate::parser::functions::{ADD, DIVIDE, Function, MULTIPLY, POWER, ROOT, SUBTRACT};

/// Precedence tier of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `+` and `-`: parsed first, bind loosest.
    Low,
    /// `*`, `/` and `^`: bind tightest.
    High,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Debug, Clone, Copy)]
struct OperatorEntry {
    op: Operator,
    tier: Tier,
    forward: &'static Function,
    reverse: &'static Function,
}

const OPERATOR_TABLE: &[(char, OperatorEntry)] = &[
    (
        '+',
        OperatorEntry {
            op: Operator::Add,
            tier: Tier::Low,
            forward: &ADD,
            reverse: &SUBTRACT,
        },
    ),
    (
        '-',
        OperatorEntry {
            op: Operator::Subtract,
            tier: Tier::Low,
            forward: &SUBTRACT,
            reverse: &ADD,
        },
    ),
    (
        '*',
        OperatorEntry {
            op: Operator::Multiply,
            tier: Tier::High,
            forward: &MULTIPLY,
            reverse: &DIVIDE,
        },
    ),
    (
        '/',
        OperatorEntry {
            op: Operator::Divide,
            tier: Tier::High,
            forward: &DIVIDE,
            reverse: &MULTIPLY,
        },
    ),
    (
        '^',
        OperatorEntry {
            op: Operator::Power,
            tier: Tier::High,
            forward: &POWER,
            reverse: &ROOT,
        },
    ),
];

fn entry(op: Operator) -> &'static OperatorEntry {
    OPERATOR_TABLE
        .iter()
        .map(|(_, entry)| entry)
        .find(|entry| entry.op == op)
        .unwrap_or_else(|| unreachable!("every operator has a table entry"))
}

impl Operator {
    /// Lookup the operator spelled by `ch`.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find_map(|(c, entry)| (*c == ch).then_some(entry.op))
    }

    /// Operators belonging to `tier`, in table order.
    pub fn in_tier(tier: Tier) -> impl Iterator<Item = Self> {
        OPERATOR_TABLE
            .iter()
            .filter(move |(_, entry)| entry.tier == tier)
            .map(|(_, entry)| entry.op)
    }

    /// The character that spells this operator.
    #[must_use]
    pub fn symbol(self) -> char {
        OPERATOR_TABLE
            .iter()
            .find_map(|(c, entry)| (entry.op == self).then_some(*c))
            .unwrap_or_else(|| unreachable!("every operator has a table entry"))
    }

    /// The precedence tier.
    #[must_use]
    pub fn tier(self) -> Tier {
        entry(self).tier
    }

    /// The function computing `lhs op rhs`.
    #[must_use]
    pub fn function(self) -> &'static Function {
        entry(self).forward
    }

    /// The function that undoes this operator (`-` for `+`, `root` for `^`).
    #[must_use]
    pub fn reverse(self) -> &'static Function {
        entry(self).reverse
    }

    /// Compute `lhs op rhs`.
    ///
    /// # Errors
    /// Returns [`SyntaxError::DivideByZero`] for division by exactly zero.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, SyntaxError> {
        self.function().call(&[lhs, rhs])
    }
}
