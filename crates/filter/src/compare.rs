//! The recursive predicate evaluator.
//!
//! `compare` walks a filter specification and a target value in
//! lockstep. Objects are strict conjunctions over their fields, with an
//! existential match when the target field is an array; sequences are
//! conjunctions of every element against the same target; scalars
//! dispatch on the operand and the coerced value types.

use serde_json::Value;

use crate::spec::{FilterSpec, Operand};
use crate::timestamp;
use crate::types::{json_type_name, FilterError, ScalarValue};

/// Field names whose values are timestamps and must be compared as
/// epoch seconds.
const DATE_FIELDS: [&str; 2] = ["datetimeIso", "local_datetime"];

fn is_date_field(key: &str) -> bool {
    DATE_FIELDS.contains(&key)
}

/// Decide whether `spec` matches `target`.
///
/// `date_hint` marks the target as a timestamp; it is set per field
/// from the field's own name and passed through sequence elements
/// unchanged. Missing target fields are a match failure, never an
/// error.
pub fn compare(spec: &FilterSpec, target: &Value, date_hint: bool) -> Result<bool, FilterError> {
    match spec {
        FilterSpec::Object(fields) => {
            for (key, sub) in fields {
                let Some(field) = target.get(key) else {
                    // Key missing, or target is not an object at all.
                    return Ok(false);
                };
                let hint = is_date_field(key);
                let matched = match field {
                    // Existential match over array-valued fields.
                    Value::Array(elements) => {
                        let mut any = false;
                        for element in elements {
                            if compare(sub, element, hint)? {
                                any = true;
                                break;
                            }
                        }
                        any
                    }
                    other => compare(sub, other, hint)?,
                };
                if !matched {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        FilterSpec::Sequence(items) => {
            // Conjunction against the same target, not a narrowing.
            for item in items {
                if !compare(item, target, date_hint)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        FilterSpec::Scalar { operand, value } => eval_scalar(*operand, value, target, date_hint),
    }
}

fn eval_scalar(
    operand: Operand,
    value: &ScalarValue,
    target: &Value,
    date_hint: bool,
) -> Result<bool, FilterError> {
    if date_hint {
        return eval_dates(operand, value, target);
    }

    // The literal "undefined" token stands for an absent value.
    let value = match value {
        ScalarValue::Text(s) if s == "undefined" => &ScalarValue::Null,
        other => other,
    };

    // Two strings always compare by containment, whatever the operand.
    if let (ScalarValue::Text(needle), Value::String(haystack)) = (value, target) {
        return Ok(match operand {
            Operand::Neq => !haystack.contains(needle.as_str()),
            _ => haystack.contains(needle.as_str()),
        });
    }

    match operand {
        Operand::Eq | Operand::Implicit => Ok(scalar_equals(value, target)),
        Operand::Neq => Ok(!scalar_equals(value, target)),
        Operand::Gt => {
            let (filter, target) = numeric_pair(operand, value, target)?;
            Ok(target > filter)
        }
        Operand::Lt => {
            let (filter, target) = numeric_pair(operand, value, target)?;
            Ok(target < filter)
        }
    }
}

/// Date-hinted comparison: both sides must be timestamp strings and are
/// collapsed to epoch seconds before ordering.
fn eval_dates(operand: Operand, value: &ScalarValue, target: &Value) -> Result<bool, FilterError> {
    let filter_input = match value {
        ScalarValue::Text(s) => s.as_str(),
        ScalarValue::Number(n) => {
            return Err(FilterError::DateParse {
                input: n.to_string(),
            })
        }
        ScalarValue::Null => {
            return Err(FilterError::DateParse {
                input: "null".to_string(),
            })
        }
    };
    let target_input = target.as_str().ok_or_else(|| FilterError::DateParse {
        input: target.to_string(),
    })?;

    let filter_secs = timestamp::epoch_seconds(filter_input)?;
    let target_secs = timestamp::epoch_seconds(target_input)?;
    Ok(match operand {
        Operand::Eq | Operand::Implicit => filter_secs == target_secs,
        Operand::Neq => filter_secs != target_secs,
        Operand::Gt => target_secs > filter_secs,
        Operand::Lt => target_secs < filter_secs,
    })
}

/// Equality between a coerced filter value and a target JSON value.
/// Mismatched types are unequal, never an error.
fn scalar_equals(value: &ScalarValue, target: &Value) -> bool {
    match (value, target) {
        (ScalarValue::Number(n), Value::Number(m)) => m.as_f64().is_some_and(|m| *n == m),
        (ScalarValue::Text(s), Value::String(t)) => s == t,
        (ScalarValue::Null, Value::Null) => true,
        _ => false,
    }
}

/// Extract both sides of a relational comparison as numbers, or fail
/// with a type mismatch.
fn numeric_pair(
    operand: Operand,
    value: &ScalarValue,
    target: &Value,
) -> Result<(f64, f64), FilterError> {
    let mismatch = || FilterError::TypeMismatch {
        operand: operand.symbol(),
        filter: value.type_name(),
        target: json_type_name(target),
    };
    let filter = match value {
        ScalarValue::Number(n) => *n,
        _ => return Err(mismatch()),
    };
    let target = target.as_f64().ok_or_else(mismatch)?;
    Ok((filter, target))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(spec: serde_json::Value, target: serde_json::Value) -> Result<bool, FilterError> {
        let spec = FilterSpec::from_json(&spec).unwrap();
        compare(&spec, &target, false)
    }

    #[test]
    fn scalar_numeric_equality() {
        assert!(check(json!(20), json!(20)).unwrap());
        assert!(check(json!("20"), json!(20)).unwrap());
        assert!(!check(json!(20), json!(21)).unwrap());
        assert!(check(json!(20), json!(20.0)).unwrap());
    }

    #[test]
    fn scalar_relational_inversion() {
        // ">-1" matches targets greater than -1.
        assert!(check(json!(">-1"), json!(0)).unwrap());
        assert!(!check(json!(">0"), json!(0)).unwrap());
        assert!(check(json!("<33"), json!(32)).unwrap());
        assert!(!check(json!("<33"), json!(33)).unwrap());
    }

    #[test]
    fn string_containment() {
        assert!(check(json!("foo"), json!("foobar")).unwrap());
        assert!(check(json!("=foo"), json!("foobar")).unwrap());
        assert!(!check(json!("~foo"), json!("foobar")).unwrap());
        assert!(check(json!("~baz"), json!("foobar")).unwrap());
    }

    #[test]
    fn relational_on_two_strings_degrades_to_containment() {
        assert!(check(json!(">foo"), json!("foobar")).unwrap());
        assert!(check(json!("<foo"), json!("foobar")).unwrap());
        assert!(!check(json!(">baz"), json!("foobar")).unwrap());
    }

    #[test]
    fn equality_across_types_is_false() {
        assert!(!check(json!("foo"), json!(5)).unwrap());
        assert!(!check(json!(5), json!("5")).unwrap());
        assert!(!check(json!(1), json!(true)).unwrap());
        assert!(check(json!("~foo"), json!(5)).unwrap());
    }

    #[test]
    fn relational_across_types_is_an_error() {
        let err = check(json!(">5"), json!("abc")).unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { operand: ">", .. }));
        assert!(check(json!(">foo"), json!(5)).is_err());
        assert!(check(json!(">5"), json!(null)).is_err());
        assert!(check(json!(">5"), json!(true)).is_err());
    }

    #[test]
    fn undefined_token_matches_null() {
        assert!(check(json!("undefined"), json!(null)).unwrap());
        assert!(!check(json!("undefined"), json!(0)).unwrap());
        assert!(check(json!("~undefined"), json!(0)).unwrap());
        assert!(!check(json!("~undefined"), json!(null)).unwrap());
    }

    #[test]
    fn object_conjunction_and_presence() {
        let rec = json!({"name": "foo", "num": 20});
        assert!(check(json!({"num": 20}), rec.clone()).unwrap());
        assert!(check(json!({"num": 20, "name": "foo"}), rec.clone()).unwrap());
        assert!(!check(json!({"num": 20, "name": "bar"}), rec.clone()).unwrap());
        // Missing field is a match failure, not an error.
        assert!(!check(json!({"missing": 1}), rec.clone()).unwrap());
        // Non-object targets never satisfy an object spec.
        assert!(!check(json!({"num": 20}), json!(5)).unwrap());
        // Empty object spec matches anything.
        assert!(check(json!({}), rec).unwrap());
    }

    #[test]
    fn array_field_matches_existentially() {
        let rec = json!({"data": [{"val": 23}, {"val": 44}]});
        assert!(check(json!({"data": {"val": 23}}), rec.clone()).unwrap());
        assert!(check(json!({"data": {"val": 44}}), rec.clone()).unwrap());
        assert!(!check(json!({"data": {"val": 99}}), rec).unwrap());
        assert!(!check(json!({"data": {"val": 1}}), json!({"data": []})).unwrap());
    }

    #[test]
    fn sequence_is_conjunction_over_same_target() {
        assert!(check(json!([">11", "<33"]), json!(20)).unwrap());
        assert!(!check(json!([">11", "<33"]), json!(40)).unwrap());
        assert!(!check(json!([">11", "<33"]), json!(5)).unwrap());
        // Empty sequence is vacuously true.
        assert!(check(json!([]), json!(5)).unwrap());
    }

    #[test]
    fn date_hint_set_per_field() {
        let rec = json!({"datetimeIso": "2021-05-13T16:07:14.467-0500"});
        let spec = FilterSpec::from_json(&json!({"datetimeIso": ">2021-05-13T00:00:00.000-0500"}))
            .unwrap();
        assert!(compare(&spec, &rec, false).unwrap());

        let before =
            FilterSpec::from_json(&json!({"datetimeIso": "<2021-05-13T00:00:00.000-0500"}))
                .unwrap();
        assert!(!compare(&before, &rec, false).unwrap());
    }

    #[test]
    fn local_datetime_is_also_date_hinted() {
        let rec = json!({"local_datetime": "2021-05-13T16:07:14.467-0500"});
        let spec =
            FilterSpec::from_json(&json!({"local_datetime": "=2021-05-13T16:07:14.467-0500"}))
                .unwrap();
        assert!(compare(&spec, &rec, false).unwrap());
    }

    #[test]
    fn date_hint_does_not_leak_into_sibling_fields() {
        // "name" must be compared as a plain string even when a date
        // field sits in the same spec object.
        let rec = json!({
            "name": "foo",
            "datetimeIso": "2021-05-13T16:07:14.467-0500",
        });
        let spec = FilterSpec::from_json(&json!({
            "name": "foo",
            "datetimeIso": ">2021-05-01T00:00:00.000-0500",
        }))
        .unwrap();
        assert!(compare(&spec, &rec, false).unwrap());
    }

    #[test]
    fn malformed_date_is_fatal() {
        let rec = json!({"datetimeIso": "garbage"});
        let spec = FilterSpec::from_json(&json!({"datetimeIso": ">2021-05-13T00:00:00.000-0500"}))
            .unwrap();
        let err = compare(&spec, &rec, false).unwrap_err();
        assert_eq!(
            err,
            FilterError::DateParse {
                input: "garbage".to_string()
            }
        );
    }

    #[test]
    fn non_string_target_under_date_hint_is_fatal() {
        let rec = json!({"datetimeIso": 1620939000});
        let spec = FilterSpec::from_json(&json!({"datetimeIso": ">2021-05-13T00:00:00.000-0500"}))
            .unwrap();
        assert!(compare(&spec, &rec, false).is_err());
    }

    #[test]
    fn idempotent_over_same_inputs() {
        let spec = FilterSpec::from_json(&json!({"num": [">11", "<33"]})).unwrap();
        let rec = json!({"num": 20});
        let first = compare(&spec, &rec, false).unwrap();
        let second = compare(&spec, &rec, false).unwrap();
        assert_eq!(first, second);
        assert!(first);
    }
}
