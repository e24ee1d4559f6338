//! JSON document model.
//!
//! [`JsonObject`] keeps its keys sorted, so serialisation is deterministic.
//! Both containers expose the same typed getters; integer getters truncate
//! toward zero and fail when the number does not fit the requested width.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::ToPrimitive;

use super::error::JsonError;

/// A JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Object(JsonObject),
    Array(JsonArray),
    Number(f64),
    Boolean(bool),
    String(String),
    /// An explicit `null` in the document.
    Null,
}

/// The type of a [`JsonValue`], for queries and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    Array,
    Number,
    Boolean,
    String,
    Null,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "an object",
            Self::Array => "an array",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::String => "a string",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

impl JsonValue {
    #[must_use]
    pub fn value_type(&self) -> JsonType {
        match self {
            Self::Object(_) => JsonType::Object,
            Self::Array(_) => JsonType::Array,
            Self::Number(_) => JsonType::Number,
            Self::Boolean(_) => JsonType::Boolean,
            Self::String(_) => JsonType::String,
            Self::Null => JsonType::Null,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for JsonValue {
    #[expect(
        clippy::cast_precision_loss,
        reason = "JSON numbers are doubles; large integers lose precision by definition"
    )]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<JsonObject> for JsonValue {
    fn from(obj: JsonObject) -> Self {
        Self::Object(obj)
    }
}

impl From<JsonArray> for JsonValue {
    fn from(arr: JsonArray) -> Self {
        Self::Array(arr)
    }
}

impl<T: Into<Self>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn expect_type<'a, T>(
    value: &'a JsonValue,
    at: &dyn fmt::Display,
    expected: JsonType,
    convert: impl FnOnce(&'a JsonValue) -> Option<T>,
) -> Result<T, JsonError> {
    convert(value).ok_or_else(|| JsonError::WrongType {
        at: at.to_string(),
        expected,
        found: value.value_type(),
    })
}

fn expect_in_range<T>(
    value: &JsonValue,
    at: &dyn fmt::Display,
    target: &'static str,
    convert: impl FnOnce(f64) -> Option<T>,
) -> Result<T, JsonError> {
    let n = expect_type(value, at, JsonType::Number, JsonValue::as_f64)?;
    convert(n).ok_or_else(|| JsonError::NumberOutOfRange {
        at: at.to_string(),
        target,
    })
}

macro_rules! typed_getters {
    ($container:ty, $key:ty) => {
        impl $container {
            /// Whether the value at `key` is an explicit `null`.
            ///
            /// # Errors
            /// Fails when `key` is absent.
            pub fn is_null(&self, key: $key) -> Result<bool, JsonError> {
                Ok(self.get(key)?.is_null())
            }

            /// The type of the value at `key`.
            ///
            /// # Errors
            /// Fails when `key` is absent.
            pub fn value_type(&self, key: $key) -> Result<JsonType, JsonError> {
                Ok(self.get(key)?.value_type())
            }

            /// # Errors
            /// Fails when `key` is absent or not a string.
            pub fn get_str(&self, key: $key) -> Result<&str, JsonError> {
                expect_type(self.get(key)?, &key, JsonType::String, JsonValue::as_str)
            }

            /// # Errors
            /// Fails when `key` is absent or not a number.
            pub fn get_f64(&self, key: $key) -> Result<f64, JsonError> {
                expect_type(self.get(key)?, &key, JsonType::Number, JsonValue::as_f64)
            }

            /// # Errors
            /// Fails when `key` is absent, not a number, or outside `f32`.
            pub fn get_f32(&self, key: $key) -> Result<f32, JsonError> {
                expect_in_range(self.get(key)?, &key, "f32", |n| n.to_f32())
            }

            /// # Errors
            /// Fails when `key` is absent, not a number, or outside `i64`.
            pub fn get_i64(&self, key: $key) -> Result<i64, JsonError> {
                expect_in_range(self.get(key)?, &key, "i64", |n| n.to_i64())
            }

            /// # Errors
            /// Fails when `key` is absent, not a number, or outside `i32`.
            pub fn get_i32(&self, key: $key) -> Result<i32, JsonError> {
                expect_in_range(self.get(key)?, &key, "i32", |n| n.to_i32())
            }

            /// # Errors
            /// Fails when `key` is absent, not a number, or outside `i16`.
            pub fn get_i16(&self, key: $key) -> Result<i16, JsonError> {
                expect_in_range(self.get(key)?, &key, "i16", |n| n.to_i16())
            }

            /// # Errors
            /// Fails when `key` is absent, not a number, or outside `i8`.
            pub fn get_i8(&self, key: $key) -> Result<i8, JsonError> {
                expect_in_range(self.get(key)?, &key, "i8", |n| n.to_i8())
            }

            /// # Errors
            /// Fails when `key` is absent or not a boolean.
            pub fn get_bool(&self, key: $key) -> Result<bool, JsonError> {
                expect_type(self.get(key)?, &key, JsonType::Boolean, JsonValue::as_bool)
            }

            /// # Errors
            /// Fails when `key` is absent or not an object.
            pub fn get_object(&self, key: $key) -> Result<&JsonObject, JsonError> {
                expect_type(self.get(key)?, &key, JsonType::Object, JsonValue::as_object)
            }

            /// # Errors
            /// Fails when `key` is absent or not an array.
            pub fn get_array(&self, key: $key) -> Result<&JsonArray, JsonError> {
                expect_type(self.get(key)?, &key, JsonType::Array, JsonValue::as_array)
            }
        }
    };
}

/// A JSON object with keys kept in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    entries: BTreeMap<String, JsonValue>,
}

impl JsonObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value stored under `key`.
    ///
    /// # Errors
    /// Returns [`JsonError::MissingKey`] when there is none.
    pub fn get(&self, key: &str) -> Result<&JsonValue, JsonError> {
        self.entries
            .get(key)
            .ok_or_else(|| JsonError::MissingKey(key.to_owned()))
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store `value` under `key`, returning any value it replaces.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Store an explicit `null` under `key`.
    pub fn set_null(&mut self, key: impl Into<String>) -> Option<JsonValue> {
        self.entries.insert(key.into(), JsonValue::Null)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

typed_getters!(JsonObject, &str);

/// A JSON array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArray {
    items: Vec<JsonValue>,
}

impl JsonArray {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value at `index`.
    ///
    /// # Errors
    /// Returns [`JsonError::IndexOutOfRange`] past the end.
    pub fn get(&self, index: usize) -> Result<&JsonValue, JsonError> {
        self.items.get(index).ok_or(JsonError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    #[must_use]
    pub fn has(&self, index: usize) -> bool {
        index < self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonValue> {
        self.items.iter()
    }

    /// Replace the value at an existing `index`, returning the old one.
    ///
    /// # Errors
    /// Returns [`JsonError::IndexOutOfRange`] past the end; use
    /// [`push`](Self::push) to grow the array.
    pub fn set(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<JsonValue, JsonError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(JsonError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn push(&mut self, value: impl Into<JsonValue>) {
        self.items.push(value.into());
    }

    pub fn push_null(&mut self) {
        self.items.push(JsonValue::Null);
    }

    /// Remove and return the value at `index`, shifting later values down.
    ///
    /// # Errors
    /// Returns [`JsonError::IndexOutOfRange`] past the end.
    pub fn remove(&mut self, index: usize) -> Result<JsonValue, JsonError> {
        if index < self.items.len() {
            Ok(self.items.remove(index))
        } else {
            Err(JsonError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

typed_getters!(JsonArray, usize);

impl FromIterator<JsonValue> for JsonArray {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
