//! Dynamic node values.
//!
//! Inputs hold whatever the caller sets (an amount, a flag, a choice key),
//! and derived fields hold whatever their strategy returns, so node values
//! are a small dynamic type rather than a bare `f64`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parameter set handed to strategies and display callbacks, keyed by node
/// name in dependency declaration order.
pub type Params = IndexMap<String, Value>;

/// A value stored in an input or a derived node.
///
/// `==` is structural. Change detection goes through
/// [`loosely_eq`](Value::loosely_eq) instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Builds a value from an enumerated key. Keys that look like integers
    /// become numbers so they compare equal to numeric input.
    pub fn from_key(key: &str) -> Self {
        match key.parse::<i64>() {
            Ok(n) => Value::Number(n as f64),
            Err(_) => Value::Text(key.to_string()),
        }
    }

    /// Numeric coercion used by sums and currency conversion.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }

    /// String form used for enumerated-domain lookups.
    pub fn key(&self) -> String {
        match self {
            Value::Null | Value::Bool(false) => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Whether the value counts as "set": non-zero, non-empty, true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty() && s != "0",
        }
    }

    /// Loose equality used for change detection.
    ///
    /// Booleans compare by truthiness. Numbers and null compare
    /// numerically, and against text only when the text is numeric. Two
    /// texts compare as numbers when both are numeric, else as strings.
    /// Not transitive: `0` and `""` both equal null but not each other.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(_), _) | (_, Value::Bool(_)) => self.is_truthy() == other.is_truthy(),
            (Value::Null | Value::Number(_), Value::Null | Value::Number(_)) => self.as_f64() == other.as_f64(),
            (Value::Null, Value::Text(s)) | (Value::Text(s), Value::Null) => s.is_empty(),
            (Value::Number(n), Value::Text(s)) | (Value::Text(s), Value::Number(n)) => numeric_text(s) == Some(*n),
            (Value::Text(a), Value::Text(b)) => match (numeric_text(a), numeric_text(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }
}

/// Parses text that reads as a finite number.
fn numeric_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
