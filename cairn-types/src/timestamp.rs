//! Timestamp canonicalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A trailing timezone qualifier: `Z` or a `±HHMM` offset.
    static ref TIMEZONE_SUFFIX: Regex = Regex::new(r"(?:Z|[+-]\d{4})$").unwrap();
}

/// Qualify an ISO-8601-like timestamp with an explicit timezone.
///
/// Timestamps that already end in `Z` or a `±HHMM` offset pass through
/// unchanged; anything else is taken to be UTC and gets a `Z` appended.
/// Total and idempotent.
pub fn normalize_timestamp(timestamp: &str) -> String {
    if TIMEZONE_SUFFIX.is_match(timestamp) {
        timestamp.to_string()
    } else {
        format!("{}Z", timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_timestamp;
    use parameterized::parameterized;
    use proptest::prelude::*;

    #[test]
    fn test_naive_timestamp_gets_utc_marker() {
        assert_eq!(
            normalize_timestamp("2012-07-17T14:35:35"),
            "2012-07-17T14:35:35Z"
        );
    }

    #[parameterized(timestamp = {
        "2012-07-17T14:35:35Z",
        "2012-07-17T14:35:35+0100",
        "2012-07-17T14:35:35-0400",
    })]
    fn test_qualified_timestamps_pass_through(timestamp: &str) {
        assert_eq!(normalize_timestamp(timestamp), timestamp);
    }

    proptest! {
        /// Normalizing twice is the same as normalizing once, whatever the input.
        #[test]
        // "\\PC*" is a regex for any number of Printable Characters.
        fn test_normalize_is_idempotent(s in "\\PC*") {
            let once = normalize_timestamp(&s);
            prop_assert_eq!(normalize_timestamp(&once), once);
        }
    }
}
