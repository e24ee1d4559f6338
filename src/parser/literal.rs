//! Literal value grammar shared by every parser in the crate.
//!
//! Each rule skips leading whitespace, then either recognises its literal,
//! reports `Ok(None)` when the lookahead cannot start one, or fails with a
//! [`SyntaxError`] once it has committed to a malformed literal. Callers use
//! the `Ok(None)` case to try their own alternatives.

use crate::error::SyntaxError;
use crate::tokenizer::Cursor;

/// A string, number or boolean read by [`parse_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted text with the quotes removed and escapes kept verbatim.
    String(String),
    /// Any decimal number, optionally signed or in exponent form.
    Number(f64),
    /// `true` or `false`.
    Bool(bool),
}

/// Parse a single- or double-quoted string.
///
/// A backslash escapes the following character, which is copied verbatim
/// along with the backslash itself; no escape sequence is interpreted.
///
/// # Errors
/// Returns [`SyntaxError::UnterminatedString`] when the input ends before the
/// closing quote.
///
/// # Examples
///
/// ```rust
/// use tokeval::parser::literal::parse_string;
/// use tokeval::tokenizer::Cursor;
///
/// let mut cursor = Cursor::from(r#"'it\'s'"#);
/// assert_eq!(parse_string(&mut cursor), Ok(Some(r"it\'s".to_string())));
/// ```
pub fn parse_string(cursor: &mut Cursor) -> Result<Option<String>, SyntaxError> {
    cursor.skip_whitespace();
    let quote = match cursor.peek() {
        Some(q @ ('\'' | '"')) => q,
        _ => return Ok(None),
    };
    cursor.pop();

    let mut text = String::new();
    let mut escaped = false;
    while let Some(ch) = cursor.pop() {
        if escaped {
            escaped = false;
            text.push(ch);
        } else if ch == quote {
            return Ok(Some(text));
        } else {
            escaped = ch == '\\';
            text.push(ch);
        }
    }
    Err(SyntaxError::UnterminatedString)
}

/// Parse a decimal number.
///
/// Accepts an optional leading sign, digits and at most one decimal point.
/// With `allow_exponent`, an `e`/`E` marker is followed by a signed exponent
/// (itself parsed without exponent support) and the result is
/// `mantissa × 10^exponent`.
///
/// A sign or point with no digits after it is injected back into the cursor
/// and reported as `Ok(None)`, leaving it for an operator rule to read.
///
/// # Errors
/// Returns [`SyntaxError::MultipleDecimalPoints`] for a second `.`.
pub fn parse_number(cursor: &mut Cursor, allow_exponent: bool) -> Result<Option<f64>, SyntaxError> {
    cursor.skip_whitespace();
    let mut text = String::new();
    let mut seen_point = false;

    while let Some(ch) = cursor.peek() {
        match ch {
            '0'..='9' => text.push(ch),
            '+' | '-' if text.is_empty() => text.push(ch),
            '.' if seen_point => return Err(SyntaxError::MultipleDecimalPoints),
            '.' => {
                seen_point = true;
                text.push(ch);
            }
            'e' | 'E' if allow_exponent && !text.is_empty() => {
                cursor.pop();
                if is_lone_sign(&text) {
                    text.push('1');
                }
                if let Some(exponent) = parse_number(cursor, false)? {
                    return Ok(to_number(&text).map(|m| m * 10_f64.powf(exponent)));
                }
                continue;
            }
            _ => break,
        }
        cursor.pop();
    }

    if text.chars().any(|c| c.is_ascii_digit()) {
        Ok(to_number(&text))
    } else {
        cursor.inject(&text);
        Ok(None)
    }
}

fn is_lone_sign(text: &str) -> bool {
    matches!(text, "+" | "-")
}

fn to_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Parse the literal `true` or `false`.
///
/// A lookahead of `t` commits to reading four characters and `f` to five.
///
/// # Errors
/// Returns [`SyntaxError::InvalidBooleanLiteral`] when the characters read do
/// not spell the expected word exactly.
pub fn parse_boolean(cursor: &mut Cursor) -> Result<Option<bool>, SyntaxError> {
    cursor.skip_whitespace();
    let (expected, word) = match cursor.peek() {
        Some('t') => (true, "true"),
        Some('f') => (false, "false"),
        _ => return Ok(None),
    };
    let found: String = (0..word.chars().count())
        .map_while(|_| cursor.pop())
        .collect();
    if found == word {
        Ok(Some(expected))
    } else {
        Err(SyntaxError::InvalidBooleanLiteral { expected, found })
    }
}

/// Parse whichever literal the lookahead announces.
///
/// Quotes start a string, digits and signs a number (with exponent support)
/// and `t`/`f` a boolean. Anything else yields `Ok(None)` so the caller can
/// try its own productions.
///
/// # Errors
/// Propagates the error of the rule that was dispatched to.
pub fn parse_value(cursor: &mut Cursor) -> Result<Option<Literal>, SyntaxError> {
    cursor.skip_whitespace();
    match cursor.peek() {
        Some('\'' | '"') => Ok(parse_string(cursor)?.map(Literal::String)),
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
            Ok(parse_number(cursor, true)?.map(Literal::Number))
        }
        Some('t' | 'f') => Ok(parse_boolean(cursor)?.map(Literal::Bool)),
        _ => Ok(None),
    }
}
