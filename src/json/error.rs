//! Errors raised when reading typed data out of a JSON document.

use thiserror::Error;

use crate::error::SyntaxError;

use super::value::JsonType;

/// Failure to find or convert a value in a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    /// The object has no entry for the key.
    #[error("no entry for key '{0}'")]
    MissingKey(String),
    /// The array index is past the end.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// The value exists but has another type.
    #[error("value at '{at}' is {found}, expected {expected}")]
    WrongType {
        at: String,
        expected: JsonType,
        found: JsonType,
    },
    /// The number does not fit the requested numeric type.
    #[error("number at '{at}' does not fit in {target}")]
    NumberOutOfRange { at: String, target: &'static str },
    /// The document text itself is malformed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
