//! Filter specification tree and its construction from JSON.
//!
//! A specification is a closed sum of three shapes. Objects are
//! conjunctions over named fields, sequences are conjunctions of every
//! element against the same target, and scalars are single comparisons
//! carrying an optional leading operand character.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{FilterError, ScalarValue};

// ──────────────────────────────────────────────
// Operands
// ──────────────────────────────────────────────

/// The comparison operand encoded as the first character of a scalar
/// filter token.
///
/// `Gt` / `Lt` describe the *target* relative to the filter value:
/// `">5"` matches targets greater than 5, `"<5"` matches targets less
/// than 5. `Implicit` (no recognized leading character) behaves like
/// `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Eq,
    Neq,
    Gt,
    Lt,
    Implicit,
}

impl Operand {
    /// Split a raw string token into its operand and remaining text.
    pub fn strip(token: &str) -> (Operand, &str) {
        let mut chars = token.chars();
        match chars.next() {
            Some('=') => (Operand::Eq, chars.as_str()),
            Some('~') => (Operand::Neq, chars.as_str()),
            Some('>') => (Operand::Gt, chars.as_str()),
            Some('<') => (Operand::Lt, chars.as_str()),
            _ => (Operand::Implicit, token),
        }
    }

    /// The operand's source character, for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Operand::Eq | Operand::Implicit => "=",
            Operand::Neq => "~",
            Operand::Gt => ">",
            Operand::Lt => "<",
        }
    }
}

// ──────────────────────────────────────────────
// Specification tree
// ──────────────────────────────────────────────

/// A declarative filter specification.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Conjunction over named target fields.
    Object(BTreeMap<String, FilterSpec>),
    /// Conjunction of each element against the same target value.
    Sequence(Vec<FilterSpec>),
    /// A single scalar comparison.
    Scalar { operand: Operand, value: ScalarValue },
}

impl FilterSpec {
    /// Build a specification from decoded JSON.
    ///
    /// String tokens have their leading operand stripped, then are kept
    /// as integers when they parse as one and as text otherwise. Numeric
    /// literals carry no operand. Booleans and nulls are rejected.
    pub fn from_json(value: &Value) -> Result<FilterSpec, FilterError> {
        match value {
            Value::Object(fields) => {
                let mut spec = BTreeMap::new();
                for (key, sub) in fields {
                    spec.insert(key.clone(), FilterSpec::from_json(sub)?);
                }
                Ok(FilterSpec::Object(spec))
            }
            Value::Array(items) => {
                let spec = items
                    .iter()
                    .map(FilterSpec::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FilterSpec::Sequence(spec))
            }
            Value::String(token) => {
                let (operand, rest) = Operand::strip(token);
                let value = match rest.parse::<i64>() {
                    Ok(n) => ScalarValue::Number(n as f64),
                    Err(_) => ScalarValue::Text(rest.to_string()),
                };
                Ok(FilterSpec::Scalar { operand, value })
            }
            Value::Number(n) => {
                let value = n.as_f64().ok_or_else(|| FilterError::InvalidSpec {
                    message: format!("numeric literal {} out of range", n),
                })?;
                Ok(FilterSpec::Scalar {
                    operand: Operand::Implicit,
                    value: ScalarValue::Number(value),
                })
            }
            Value::Bool(_) | Value::Null => Err(FilterError::InvalidSpec {
                message: format!(
                    "expected object, array, string, or number, got {}",
                    crate::types::json_type_name(value)
                ),
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
