//! The filter driver: one or more specifications against a list of
//! records.

use serde_json::Value;

use crate::compare::compare;
use crate::spec::FilterSpec;
use crate::types::FilterError;

/// Apply a filter specification to a list of records.
///
/// A `Sequence` specification is a list of independent specifications,
/// each run over the whole record list in turn; any other shape is a
/// single specification. Output is grouped by specification, in
/// original record order within each pass, and a record matching
/// several specifications appears once per match -- the selection is an
/// inclusive union, not a deduplicated set. `reverse` negates every
/// per-record result.
pub fn filter_array<'a>(
    spec: &FilterSpec,
    records: &'a [Value],
    reverse: bool,
) -> Result<Vec<&'a Value>, FilterError> {
    let single = std::slice::from_ref(spec);
    let specs: &[FilterSpec] = match spec {
        FilterSpec::Sequence(items) => items,
        _ => single,
    };

    let mut output = Vec::new();
    for spec in specs {
        for record in records {
            let mut matched = compare(spec, record, false)?;
            if reverse {
                matched = !matched;
            }
            if matched {
                output.push(record);
            }
        }
    }
    Ok(output)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
