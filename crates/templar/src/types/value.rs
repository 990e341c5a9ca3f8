use std::fmt::{self, Display, Formatter};

use serde_json::Value as JsonValue;

/// A runtime value substituted for a placeholder.
///
/// Resolvers produce a `Value`; the evaluator appends its `Display` form to
/// the output buffer.
///
/// # Example
///
/// ```
/// use templar::Value;
///
/// let count: Value = 12.into();
/// let kind: Value = "simple".into();
/// let absent: Value = Option::<i32>::None.into();
///
/// assert_eq!(count.to_string(), "12");
/// assert_eq!(kind.as_str(), Some("simple"));
/// assert_eq!(absent.to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent value. Renders as `null`.
    Null,

    /// A boolean.
    Bool(bool),

    /// An integer number.
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A string value.
    String(String),
}

impl Value {
    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is numeric.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Number(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

/// Values above `i64::MAX` keep their digits as a string.
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or_else(|_| Value::String(n.to_string()), Value::Number)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or_else(|_| Value::String(n.to_string()), Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Scalars map onto their counterparts; arrays and objects are rendered as
/// compact JSON text.
impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(i),
                None if n.is_u64() => Value::String(n.to_string()),
                None => n.as_f64().map_or_else(|| Value::String(n.to_string()), Value::Float),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Value::String(json.to_string()),
        }
    }
}
