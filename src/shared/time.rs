use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Offset of the client's local time from UTC, in minutes, using the
/// JavaScript `Date.getTimezoneOffset()` convention: `utc = local + offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TzOffset(pub i32);

impl TzOffset {
    pub fn minutes(&self) -> i32 {
        self.0
    }

    fn millis(&self) -> i64 {
        i64::from(self.0) * 60_000
    }
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Utility for reading filter time literals into epoch milliseconds (UTC).
pub struct TimeParser;

impl TimeParser {
    /// Parse a time literal into epoch milliseconds.
    /// RFC 3339 strings carry their own offset; date and date-time strings
    /// without one are read as the client's local time.
    pub fn parse_str_to_epoch_millis(input: &str, tz: TzOffset) -> Option<i64> {
        let s = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.timestamp_millis());
        }
        for format in LOCAL_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(naive.and_utc().timestamp_millis() + tz.millis());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(naive.and_utc().timestamp_millis() + tz.millis());
        }
        None
    }

    /// Heuristic normalization of integer magnitudes to milliseconds.
    /// - up to 11 digits: seconds
    /// - 12..=14: milliseconds
    /// - 15..=16: microseconds
    /// - 17..=19: nanoseconds
    pub fn normalize_integer_epoch_millis(n: i128) -> Option<i64> {
        let digits = num_digits_u128(n.unsigned_abs());
        let millis = match digits {
            0..=11 => n * 1_000,
            12..=14 => n,
            15..=16 => n / 1_000,
            17..=19 => n / 1_000_000,
            _ => return None,
        };
        i64::try_from(millis).ok()
    }
}

fn num_digits_u128(mut x: u128) -> u32 {
    if x == 0 {
        return 1;
    }
    let mut c = 0;
    while x > 0 {
        x /= 10;
        c += 1;
    }
    c
}
