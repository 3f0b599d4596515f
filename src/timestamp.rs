//! Conversions between Unix time and the Gregorian-epoch UUID timestamp.
//!
//! UUIDv1 timestamps count 100-nanosecond intervals since 1582-10-15T00:00:00Z, the date of the
//! Gregorian reform. Converting from Unix nanoseconds truncates the two least significant decimal
//! digits.

/// Number of 100-nanosecond ticks between the Gregorian epoch and the Unix epoch.
pub const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;

/// Largest value representable by the 60-bit timestamp field.
pub const MAX_TICKS: u64 = (1 << 60) - 1;

/// Converts a Unix timestamp in nanoseconds to Gregorian-epoch 100-nanosecond ticks.
///
/// # Examples
///
/// ```rust
/// use uuid1::timestamp::{from_unix_nanos, to_unix_nanos};
///
/// let ticks = from_unix_nanos(1_700_000_000_123_456_789);
/// assert_eq!(to_unix_nanos(ticks), 1_700_000_000_123_456_700);
/// ```
pub const fn from_unix_nanos(unix_nanos: i64) -> u64 {
    (unix_nanos / 100).wrapping_add(GREGORIAN_OFFSET as i64) as u64
}

/// Converts Gregorian-epoch 100-nanosecond ticks to a Unix timestamp in nanoseconds.
///
/// Returns `i128` so that every 60-bit tick count maps without overflow.
pub const fn to_unix_nanos(ticks: u64) -> i128 {
    (ticks as i128 - GREGORIAN_OFFSET as i128) * 100
}

#[cfg(test)]
mod tests {
    use super::{from_unix_nanos, to_unix_nanos, GREGORIAN_OFFSET};

    /// Truncates nanoseconds to 100ns granularity on round trip
    #[test]
    fn truncates_nanoseconds_to_100ns_granularity_on_round_trip() {
        use std::time;
        let now = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_nanos() as i64;

        let cases = [
            0,
            1,
            99,
            100,
            101,
            1_700_000_000_123_456_789,
            now,
            -1,
            -150,
            -1_000_000_000_000_000_123,
        ];
        for t in cases {
            assert_eq!(to_unix_nanos(from_unix_nanos(t)), (t / 100 * 100) as i128);
        }
    }

    /// Maps both epochs to the expected tick counts
    #[test]
    fn maps_both_epochs_to_the_expected_tick_counts() {
        assert_eq!(from_unix_nanos(0), GREGORIAN_OFFSET);
        assert_eq!(to_unix_nanos(GREGORIAN_OFFSET), 0);
        assert_eq!(from_unix_nanos(-100), GREGORIAN_OFFSET - 1);
        assert_eq!(to_unix_nanos(0), -12_219_292_800_000_000_000);
    }
}
