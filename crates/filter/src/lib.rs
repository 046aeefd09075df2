//! Structural filter evaluator for sigcap telemetry records.
//!
//! A filter specification is a JSON value: objects are conjunctions
//! over record fields, arrays are conjunctions of every element against
//! the same value, and scalars compare with an optional leading operand
//! character (`=` contains/equals, `~` negation, `>` / `<` relational).
//! Array-valued record fields match existentially. Fields named
//! `datetimeIso` or `local_datetime` compare as timestamps.
//!
//! Evaluation is pure and synchronous: nothing is mutated, no I/O
//! happens, and the same inputs always produce the same output.

pub mod compare;
pub mod driver;
pub mod spec;
pub mod timestamp;
pub mod types;

pub use compare::compare;
pub use driver::filter_array;
pub use spec::{FilterSpec, Operand};
pub use timestamp::epoch_seconds;
pub use types::{FilterError, ScalarValue};

/// Apply a JSON filter specification to a list of records.
///
/// This is the top-level entry point used by batch processing: it
/// builds the [`FilterSpec`] and runs [`filter_array`] in one step.
pub fn filter_records<'a>(
    filter: &serde_json::Value,
    records: &'a [serde_json::Value],
    reverse: bool,
) -> Result<Vec<&'a serde_json::Value>, FilterError> {
    let spec = FilterSpec::from_json(filter)?;
    filter_array(&spec, records, reverse)
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
