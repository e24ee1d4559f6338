//! Expression tree and operator table.
//!
//! [`Component`] is the tree the expression parser builds; [`Operator`] and
//! [`Tier`] describe the binary operators it understands.

mod expr;
mod precedence;

pub use expr::{Component, Composite, FunctionCall, Variable};
pub use precedence::{Operator, Tier};
