// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for timestamps written to documents and object names.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with milliseconds and a `Z` suffix.
///
/// Fixed width, so stored timestamps sort lexicographically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time formatted for a `createdAt`/`updatedAt` field.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Milliseconds since the Unix epoch, used in uploaded object names.
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_fixed_width_with_z() {
        let t = Utc.with_ymd_and_hms(2026, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_utc_rfc3339(t), "2026-03-05T07:08:09.000Z");
    }

    #[test]
    fn test_now_sorts_after_fixed_past() {
        assert!(now_rfc3339().as_str() > "2026-01-01T00:00:00.000Z");
    }
}
