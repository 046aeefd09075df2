//! Derived per-record fields: operator name and network type.

use serde_json::Value;

/// Placeholder operator names that mean "no real operator reported".
const OPERATOR_PLACEHOLDERS: [&str; 3] = [
    "Searching for Service",
    "Extended Network",
    "Preferred System",
];

/// Carriers whose sub-brand suffixes collapse to the parent name.
const CANONICAL_CARRIERS: [&str; 4] = ["AT&T", "Sprint", "T-Mobile", "Verizon"];

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Resolve the operator name of a record.
///
/// `opName` wins unless empty or a placeholder, then `simName`, then
/// `carrierName`, then `"Unknown"`. Sub-branded names collapse to the
/// canonical carrier ("Verizon Wireless" reports as "Verizon").
pub fn operator_name(record: &Value) -> String {
    let reported = match str_field(record, "opName") {
        Some(op) if !OPERATOR_PLACEHOLDERS.contains(&op) => op,
        _ => str_field(record, "simName")
            .or_else(|| str_field(record, "carrierName"))
            .unwrap_or("Unknown"),
    };

    let trimmed = reported.trim();
    for carrier in CANONICAL_CARRIERS {
        if trimmed != carrier && trimmed.starts_with(carrier) {
            return carrier.to_string();
        }
    }
    trimmed.to_string()
}

fn array_field<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Whether a cell entry reports itself as the serving (primary) cell.
pub fn is_primary(cell: &Value) -> bool {
    cell.get("status").and_then(Value::as_str) == Some("primary")
}

/// Classify the record's radio attach state from its cell lists.
pub fn network_type(record: &Value) -> String {
    let nr_cells = array_field(record, "nr_info");
    let has_nr = !nr_cells.is_empty();
    let has_primary_nr = nr_cells.iter().any(is_primary);
    let has_lte = !array_field(record, "cell_info").is_empty();

    if has_nr && has_primary_nr && !has_lte {
        "NR".to_string()
    } else if has_nr && has_lte {
        "NR-NSA".to_string()
    } else if has_lte {
        "LTE".to_string()
    } else if let Some(reported) = record.get("networkType").and_then(Value::as_str) {
        reported.to_string()
    } else {
        "unknown".to_string()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
