//! Grammar layers built on [`Cursor`](crate::tokenizer::Cursor).
//!
//! [`literal`] recognises strings, numbers and booleans and is shared by the
//! JSON and grade parsers. [`expression`] builds a [`Component`](ast::Component)
//! tree from arithmetic text, resolving calls through a
//! [`FunctionRegistry`](functions::FunctionRegistry).

pub mod ast;
pub mod expression;
pub mod functions;
pub mod literal;

pub use expression::Expression;

#[cfg(test)]
mod tests;
