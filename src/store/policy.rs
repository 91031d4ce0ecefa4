//! Freshness policy for cache entries.
//!
//! An entry is valid while it is younger than the TTL and its schema version
//! matches the current one exactly. Invalid entries are stale, not deleted:
//! they still serve as a fallback when a refresh fails.

use std::time::Duration;

use jiff::Timestamp;

use super::entry::EntryMetadata;

/// Freshness window shared by all domains.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Age of an entry in milliseconds at `now`.
///
/// Negative when `stored_at` lies in the future.
pub fn age_millis(metadata: &EntryMetadata, now: Timestamp) -> i64 {
    now.as_millisecond() - metadata.stored_at.as_millisecond()
}

/// Decide whether an entry may be served without a network refresh.
///
/// Returns `false` when metadata is absent.
pub fn is_valid(
    metadata: Option<&EntryMetadata>,
    current_version: &str,
    ttl: Duration,
    now: Timestamp,
) -> bool {
    let Some(metadata) = metadata else {
        return false;
    };
    let ttl_millis = i128::try_from(ttl.as_millis()).unwrap_or(i128::MAX);
    i128::from(age_millis(metadata, now)) < ttl_millis && metadata.schema_version == current_version
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use proptest::prelude::*;

    fn metadata(stored_at: Timestamp, version: &str) -> EntryMetadata {
        EntryMetadata {
            stored_at,
            schema_version: version.to_string(),
            size_bytes: 0,
            compressed: false,
        }
    }

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_millisecond(millis).unwrap()
    }

    #[test]
    fn test_missing_metadata_is_invalid() {
        assert!(!is_valid(None, "1.0", DEFAULT_TTL, Timestamp::now()));
    }

    #[test]
    fn test_fresh_entry_is_valid() {
        let now = Timestamp::now();
        let stored = now.checked_sub(SignedDuration::from_hours(1)).unwrap();
        assert!(is_valid(Some(&metadata(stored, "1.0")), "1.0", DEFAULT_TTL, now));
    }

    #[test]
    fn test_expired_entry_is_invalid() {
        let now = Timestamp::now();
        let stored = now.checked_sub(SignedDuration::from_hours(25)).unwrap();
        assert!(!is_valid(Some(&metadata(stored, "1.0")), "1.0", DEFAULT_TTL, now));
    }

    #[test]
    fn test_ttl_boundary_is_exclusive() {
        let ttl = Duration::from_millis(1_000);
        let meta = metadata(at(10_000), "1.0");
        assert!(is_valid(Some(&meta), "1.0", ttl, at(10_999)));
        assert!(!is_valid(Some(&meta), "1.0", ttl, at(11_000)));
    }

    #[test]
    fn test_version_mismatch_is_invalid_regardless_of_age() {
        let now = Timestamp::now();
        assert!(!is_valid(Some(&metadata(now, "0.9")), "1.0", DEFAULT_TTL, now));
        assert!(!is_valid(Some(&metadata(now, "1.0.0")), "1.0", DEFAULT_TTL, now));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_validity_matches_age_and_version(
            stored in 0i64..4_000_000_000_000,
            age in -1_000_000i64..200_000_000,
            ttl_ms in 1u64..100_000_000,
            stored_version in prop_oneof![Just("1.0"), Just("1.1"), Just("2.0")],
            current_version in prop_oneof![Just("1.0"), Just("1.1"), Just("2.0")],
        ) {
            let meta = metadata(at(stored), stored_version);
            let now = at(stored + age);
            let expected = age < ttl_ms as i64 && stored_version == current_version;
            prop_assert_eq!(
                is_valid(Some(&meta), current_version, Duration::from_millis(ttl_ms), now),
                expected
            );
        }
    }
}
