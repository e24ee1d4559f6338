//! JSON serialisation.
//!
//! Compact output has no whitespace at all. Indented output puts every entry
//! on its own line, indented with one tab per nesting level, and separates
//! keys from values with `": "`. Strings are written back exactly as stored,
//! since the parser keeps escape sequences verbatim.

use std::fmt::{self, Write};

use super::value::{JsonArray, JsonObject, JsonValue};

/// Writes [`JsonValue`]s to any [`fmt::Write`] sink.
#[derive(Debug)]
pub struct JsonWriter<W> {
    out: W,
    indent: bool,
    depth: usize,
}

impl<W: Write> JsonWriter<W> {
    #[must_use]
    pub fn new(out: W, indent: bool) -> Self {
        Self {
            out,
            indent,
            depth: 0,
        }
    }

    /// Serialise `value`.
    ///
    /// # Errors
    /// Propagates failures of the underlying sink.
    pub fn write_value(&mut self, value: &JsonValue) -> fmt::Result {
        match value {
            JsonValue::Object(obj) => self.write_object(obj),
            JsonValue::Array(arr) => self.write_array(arr),
            JsonValue::Number(n) if n.is_finite() => write!(self.out, "{n}"),
            JsonValue::Number(_) | JsonValue::Null => self.out.write_str("null"),
            JsonValue::Boolean(b) => write!(self.out, "{b}"),
            JsonValue::String(s) => self.write_string(s),
        }
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_string(&mut self, s: &str) -> fmt::Result {
        self.out.write_char('"')?;
        self.out.write_str(s)?;
        self.out.write_char('"')
    }

    fn write_object(&mut self, obj: &JsonObject) -> fmt::Result {
        if obj.is_empty() {
            return self.out.write_str("{}");
        }
        self.out.write_char('{')?;
        self.depth += 1;
        for (i, (key, value)) in obj.iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            self.line_break()?;
            self.write_string(key)?;
            self.out.write_str(if self.indent { ": " } else { ":" })?;
            self.write_value(value)?;
        }
        self.depth -= 1;
        self.line_break()?;
        self.out.write_char('}')
    }

    fn write_array(&mut self, arr: &JsonArray) -> fmt::Result {
        if arr.is_empty() {
            return self.out.write_str("[]");
        }
        self.out.write_char('[')?;
        self.depth += 1;
        for (i, value) in arr.iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            self.line_break()?;
            self.write_value(value)?;
        }
        self.depth -= 1;
        self.line_break()?;
        self.out.write_char(']')
    }

    fn line_break(&mut self) -> fmt::Result {
        if self.indent {
            self.out.write_char('\n')?;
            for _ in 0..self.depth {
                self.out.write_char('\t')?;
            }
        }
        Ok(())
    }
}

/// Displays a [`JsonValue`] in indented form.
#[derive(Debug, Clone, Copy)]
pub struct Pretty<'a>(&'a JsonValue);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonWriter::new(f, true).write_value(self.0)
    }
}

impl JsonValue {
    /// Indented rendering for use with `{}` formatting.
    #[must_use]
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty(self)
    }

    /// Render with one tab of indentation per nesting level.
    #[must_use]
    pub fn to_string_pretty(&self) -> String {
        self.pretty().to_string()
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonWriter::new(f, false).write_value(self)
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonWriter::new(f, false).write_object(self)
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonWriter::new(f, false).write_array(self)
    }
}
