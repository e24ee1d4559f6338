//! Library crate for tokeval.
//!
//! A character cursor with pushback, a literal grammar on top of it, and the
//! consumers of that grammar: an arithmetic expression evaluator with named
//! functions and rebindable variables, a JSON document model, and a
//! weighted-average grade solver.

#![forbid(unsafe_code)]

pub mod error;
pub mod grade;
pub mod json;
pub mod parser;
pub mod source;
pub mod tokenizer;

// Only expose test utilities to tests and opt-in consumers.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_util;

pub use error::{Error, SyntaxError};
pub use parser::Expression;
pub use parser::functions::{Function, FunctionRegistry};
pub use source::SourceResolver;
pub use tokenizer::{CharSource, Cursor};
