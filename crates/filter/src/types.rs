//! Error and scalar value types for filter evaluation.

use std::fmt;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur while building or evaluating a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The filter specification JSON has a shape the evaluator does not
    /// accept (boolean or null nodes).
    InvalidSpec { message: String },
    /// A date-hinted comparison saw a timestamp that does not parse even
    /// after timezone-offset repair.
    DateParse { input: String },
    /// A relational comparison (`>` / `<`) was asked to order values that
    /// are not both numeric.
    TypeMismatch {
        operand: &'static str,
        filter: &'static str,
        target: &'static str,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::InvalidSpec { message } => {
                write!(f, "invalid filter specification: {}", message)
            }
            FilterError::DateParse { input } => {
                write!(f, "cannot parse timestamp '{}'", input)
            }
            FilterError::TypeMismatch {
                operand,
                filter,
                target,
            } => {
                write!(
                    f,
                    "cannot order {} filter against {} value with '{}'",
                    filter, target, operand
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}

// ──────────────────────────────────────────────
// Coerced scalar values
// ──────────────────────────────────────────────

/// A coerced scalar filter value.
///
/// Scalar comparison always happens between one of these and a target
/// `serde_json::Value`. Keeping the coercion result tagged (rather than
/// comparing dynamically-typed values) pins the relational semantics in
/// exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Number(f64),
    /// Produced only by the `"undefined"` token; matches JSON null.
    Null,
}

impl ScalarValue {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Text(_) => "text",
            ScalarValue::Number(_) => "number",
            ScalarValue::Null => "null",
        }
    }
}

/// Type name of a target JSON value, for error messages.
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
