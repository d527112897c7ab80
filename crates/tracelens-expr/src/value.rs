//! Runtime value representation for the expression evaluator.
//!
//! [`Value`] is the dynamic result type of condition and watch evaluation.
//! Arrays and objects from the context enter as the opaque `Json` variant,
//! usable only for field access and equality.

use serde::{Deserialize, Serialize};

/// A runtime value produced by expression evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Opaque compound value lifted from the context record.
    Json(serde_json::Value),
}

impl Value {
    /// Truthiness used by conditions and logical operators.
    ///
    /// `null`, `false`, `0`, `NaN`, and the empty string are falsy;
    /// everything else is truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Json(v) => !v.is_null(),
        }
    }

    /// Returns a human-readable description of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Json(_) => "json",
        }
    }

    /// Lifts a `serde_json::Value` into an expression value.
    ///
    /// Scalars map to their native variants; arrays and objects stay opaque.
    pub fn from_json(v: &serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Json(other.clone()),
        }
    }

    /// Lowers the value back to `serde_json::Value` for recording.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Json(v) => v.clone(),
        }
    }
}
