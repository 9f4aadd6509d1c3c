//! Value types held by form nodes.
//!
//! This module provides the [`Value`] enum that represents every value a form
//! node can hold. Leaf values (null, booleans, numbers, text, dates) are held by
//! controls; branch values (lists and groups) are the aggregated values of
//! array and group nodes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::form::FormError;

/// Values that can be held by a form node.
///
/// # Value Types
///
/// ## Leaf Values
/// - [`Value::Null`] - Cleared or absent value
/// - [`Value::Bool`] - Boolean values (checkboxes)
/// - [`Value::Number`] - Finite or non-finite 64-bit floats
/// - [`Value::Text`] - Raw or typed text
/// - [`Value::Date`] - Dates, compared by their instant
///
/// ## Branch Values
/// - [`Value::List`] - The value of an array node
/// - [`Value::Group`] - The value of a group node, keyed by child name
///
/// # Direct Comparisons
///
/// `Value` implements `PartialEq` with primitive types for ergonomic comparisons:
///
/// ```
/// # use formkit::Value;
/// let text = Value::Text("hello".to_string());
/// let number = Value::Number(42.0);
///
/// assert!(text == "hello");
/// assert!(number == 42.0);
/// assert!(!(text == 42.0));
/// ```
///
/// # Serialization
///
/// Values serialize untagged, so a JSON document maps onto them naturally.
/// Dates serialize as ISO-8601 strings; when read back they are plain text,
/// which a date converter or the `minDate`/`maxDate` parameters parse again.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Cleared or absent value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value
    Number(f64),
    /// Text string value
    Text(String),
    /// Date and time value
    Date(NaiveDateTime),
    /// Ordered collection of values
    List(Vec<Value>),
    /// Named collection of values
    Group(BTreeMap<String, Value>),
}

impl Value {
    /// Build a date value at midnight, or `None` for an invalid calendar date.
    ///
    /// `month` is 1-based.
    pub fn date(year: i32, month: u32, day: u32) -> Option<Value> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Value::Date)
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if a validator should treat this value as "no input".
    ///
    /// Null, the empty string and whitespace-only strings are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns true if this is a leaf value
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Group(_))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Group(_) => "group",
        }
    }

    /// Returns true if both values have the same underlying type
    pub fn same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to a date
    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Attempts to convert to a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to convert to a group map
    pub fn as_group(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Group(map) => Some(map),
            _ => None,
        }
    }

    /// Milliseconds since the Unix epoch for a date value, treating it as UTC.
    pub fn as_millis(&self) -> Option<i64> {
        self.as_date().map(|d| d.and_utc().timestamp_millis())
    }

    /// Look up a child of a group value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_group().and_then(|map| map.get(key))
    }

    /// Converts to a JSON document for display or export.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Group(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Group(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Group(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Group(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl TryFrom<&Value> for f64 {
    type Error = FormError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_number().ok_or_else(|| FormError::TypeMismatch {
            expected: "number".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl TryFrom<&Value> for NaiveDateTime {
    type Error = FormError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_date().copied().ok_or_else(|| FormError::TypeMismatch {
            expected: "date".to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_number() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

/// Build a [`Value::Group`] from `key => value` pairs.
///
/// ```
/// # use formkit::{group_value, Value};
/// let v = group_value! { "a" => 5.0, "b" => "x" };
/// assert_eq!(v.get("a"), Some(&Value::Number(5.0)));
/// ```
#[macro_export]
macro_rules! group_value {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = ::std::collections::BTreeMap::<String, $crate::Value>::new();
        $(map.insert($key.to_string(), $crate::Value::from($value));)*
        $crate::Value::Group(map)
    }};
}
