//! JSON documents read with the crate's literal grammar.
//!
//! [`parse_document`] reads an object or array from a
//! [`Cursor`](crate::tokenizer::Cursor); [`JsonWriter`] turns a [`JsonValue`]
//! back into text. Types that want to live in a document implement
//! [`JsonCodec`].

mod error;
mod parse;
mod value;
mod writer;

pub use error::JsonError;
pub use parse::{open_document, parse_document};
pub use value::{JsonArray, JsonObject, JsonType, JsonValue};
pub use writer::{JsonWriter, Pretty};

/// Conversion between a type and its JSON representation.
pub trait JsonCodec: Sized {
    /// Build the JSON representation of `self`.
    fn to_json(&self) -> JsonValue;

    /// Rebuild a value from its JSON representation.
    ///
    /// # Errors
    /// Returns a [`JsonError`] when a required entry is missing or has the
    /// wrong type.
    fn from_json(json: &JsonValue) -> Result<Self, JsonError>;
}
