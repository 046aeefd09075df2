//! Timestamp normalization for date-hinted comparisons.
//!
//! Device records carry RFC-822 style timezone offsets without the
//! minute separator (`-0500`). The normalizer repairs the offset and
//! collapses the timestamp to Unix epoch seconds so both sides of a
//! comparison order numerically.

use std::borrow::Cow;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::FilterError;

/// Normalize an ISO-8601-like timestamp to epoch seconds.
///
/// When the second-to-last character is not `:`, a `:` is inserted
/// before the final two characters (`-0500` becomes `-05:00`). The
/// repaired string must then parse as RFC 3339; anything else is a
/// fatal error naming the original input.
pub fn epoch_seconds(input: &str) -> Result<f64, FilterError> {
    let repaired = repair_offset(input);
    let parsed = OffsetDateTime::parse(&repaired, &Rfc3339).map_err(|_| FilterError::DateParse {
        input: input.to_string(),
    })?;
    Ok(parsed.unix_timestamp_nanos() as f64 / 1e9)
}

fn repair_offset(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if bytes.len() < 2 || !input.is_ascii() || bytes[bytes.len() - 2] == b':' {
        return Cow::Borrowed(input);
    }
    let (head, tail) = input.split_at(input.len() - 2);
    Cow::Owned(format!("{}:{}", head, tail))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn repairs_compact_offset() {
        assert_eq!(
            repair_offset("2021-05-13T16:07:14.467-0500"),
            "2021-05-13T16:07:14.467-05:00"
        );
    }

    #[test]
    fn compact_offset_parses() {
        let expected = datetime!(2021-05-13 16:07:14.467 -5).unix_timestamp_nanos() as f64 / 1e9;
        let got = epoch_seconds("2021-05-13T16:07:14.467-0500").unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn utc_offset() {
        let got = epoch_seconds("2021-05-13T21:07:14.467+0000").unwrap();
        let local = epoch_seconds("2021-05-13T16:07:14.467-0500").unwrap();
        assert_eq!(got, local);
    }

    #[test]
    fn preserves_subseconds() {
        let a = epoch_seconds("2021-05-13T16:07:14.467-0500").unwrap();
        let b = epoch_seconds("2021-05-13T16:07:14.468-0500").unwrap();
        assert!(b > a);
        assert!((b - a - 0.001).abs() < 1e-6);
    }

    #[test]
    fn malformed_input_is_fatal() {
        let err = epoch_seconds("not a timestamp").unwrap_err();
        assert_eq!(
            err,
            FilterError::DateParse {
                input: "not a timestamp".to_string()
            }
        );
    }

    #[test]
    fn already_separated_offset_is_rejected_by_repair() {
        // The repair rule is literal: a second-to-last character other
        // than ':' always triggers insertion, so an offset that already
        // has its separator gets a second one and fails to parse.
        assert!(epoch_seconds("2021-05-13T16:07:14.467-05:00").is_err());
    }

    #[test]
    fn naive_timestamp_is_rejected() {
        assert!(epoch_seconds("2021-05-13T16:07:14.467").is_err());
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(epoch_seconds("").is_err());
        assert!(epoch_seconds("z").is_err());
    }
}
