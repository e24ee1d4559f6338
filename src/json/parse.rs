//! JSON reader built on the literal grammar.
//!
//! Only the [`Cursor`] and [`crate::parser::literal`] contract is used:
//! scalars come from [`parse_value`], and this module adds containers and
//! `null`.

use std::str::FromStr;

use log::debug;

use crate::error::{Error, SyntaxError};
use crate::parser::literal::{Literal, parse_string, parse_value};
use crate::source::SourceResolver;
use crate::tokenizer::Cursor;

use super::value::{JsonArray, JsonObject, JsonValue};

impl From<Literal> for JsonValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(s) => Self::String(s),
            Literal::Number(n) => Self::Number(n),
            Literal::Bool(b) => Self::Boolean(b),
        }
    }
}

/// Parse a document whose top level is an object or an array.
///
/// Returns `Ok(None)` without consuming anything but whitespace when the
/// input starts with anything else.
///
/// # Errors
/// Returns a [`SyntaxError`] for malformed containers.
///
/// # Examples
///
/// ```rust
/// use tokeval::json::parse_document;
/// use tokeval::tokenizer::Cursor;
///
/// let mut cursor = Cursor::from(r#"{ "a": [1, true, null] }"#);
/// let doc = parse_document(&mut cursor)
///     .unwrap_or_else(|e| panic!("{e}"))
///     .unwrap_or_else(|| panic!("not a document"));
/// assert_eq!(doc.to_string(), r#"{"a":[1,true,null]}"#);
/// ```
pub fn parse_document(cursor: &mut Cursor) -> Result<Option<JsonValue>, SyntaxError> {
    cursor.skip_whitespace();
    let doc = match cursor.peek() {
        Some('{') => JsonValue::Object(parse_object(cursor)?),
        Some('[') => JsonValue::Array(parse_array(cursor)?),
        _ => return Ok(None),
    };
    debug!("parsed JSON document ({})", doc.value_type());
    Ok(Some(doc))
}

/// Read and parse the document stored at `location`.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if the location cannot be opened or
/// holds no object or array, and [`Error::Syntax`] if it is malformed.
pub fn open_document(location: &str, resolver: &SourceResolver) -> Result<JsonValue, Error> {
    let mut cursor = Cursor::open(location, resolver)?;
    parse_document(&mut cursor)?.ok_or_else(|| {
        Error::InvalidArgument(format!("'{location}' does not hold a JSON object or array"))
    })
}

fn parse_json_value(cursor: &mut Cursor) -> Result<Option<JsonValue>, SyntaxError> {
    if let Some(literal) = parse_value(cursor)? {
        return Ok(Some(literal.into()));
    }
    match cursor.peek() {
        Some('{') => Ok(Some(JsonValue::Object(parse_object(cursor)?))),
        Some('[') => Ok(Some(JsonValue::Array(parse_array(cursor)?))),
        Some('n') => parse_null(cursor),
        _ => Ok(None),
    }
}

fn parse_null(cursor: &mut Cursor) -> Result<Option<JsonValue>, SyntaxError> {
    let word: String = (0..4).map_while(|_| cursor.pop()).collect();
    if word == "null" {
        Ok(Some(JsonValue::Null))
    } else {
        Err(SyntaxError::ExpectedToken("null"))
    }
}

fn parse_object(cursor: &mut Cursor) -> Result<JsonObject, SyntaxError> {
    if !cursor.is_next('{') {
        return Err(SyntaxError::ExpectedChar('{'));
    }
    let mut obj = JsonObject::new();
    if cursor.is_next('}') {
        return Ok(obj);
    }
    loop {
        let key = parse_string(cursor)?.ok_or(SyntaxError::ExpectedToken("key"))?;
        if !cursor.is_next(':') {
            return Err(SyntaxError::ExpectedChar(':'));
        }
        let value = parse_json_value(cursor)?.ok_or(SyntaxError::ExpectedToken("value"))?;
        obj.set(key, value);
        if !cursor.is_next(',') {
            break;
        }
    }
    if cursor.is_next('}') {
        Ok(obj)
    } else {
        Err(SyntaxError::ExpectedChar('}'))
    }
}

fn parse_array(cursor: &mut Cursor) -> Result<JsonArray, SyntaxError> {
    if !cursor.is_next('[') {
        return Err(SyntaxError::ExpectedChar('['));
    }
    let mut arr = JsonArray::new();
    while let Some(value) = parse_json_value(cursor)? {
        arr.push(value);
        if !cursor.is_next(',') {
            break;
        }
    }
    if cursor.is_next(']') {
        Ok(arr)
    } else {
        Err(SyntaxError::ExpectedChar(']'))
    }
}

impl FromStr for JsonValue {
    type Err = SyntaxError;

    /// Parse a complete document; trailing characters are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::from(s);
        let doc = parse_document(&mut cursor)?.ok_or(SyntaxError::ExpectedChar('{'))?;
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(ch) => Err(SyntaxError::UnexpectedCharacter(ch)),
            None => Ok(doc),
        }
    }
}
