//! Human-readable durations and timestamps.
//!
//! Durations are milliseconds. Timestamp helpers are generic over the time
//! zone so callers decide between `Local` for display and `Utc` in tests.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Live elapsed-time display: `"7h 5m"`, `"12m 3s"` or `"42s"`.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / MS_PER_SECOND;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Minute-granularity display used in the log and in prompts: `"1h 30m"` or `"45m"`.
pub fn format_duration_for_log(ms: u64) -> String {
    let total_minutes = ms / MS_PER_MINUTE;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// 12-hour clock time, e.g. `"10:15 PM"`.
pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%I:%M %p").to_string()
}

/// Short calendar date, e.g. `"Mar 1"`.
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%b %-d").to_string()
}

/// Numeric calendar date, e.g. `"3/1/2024"`.
pub fn format_numeric_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%Y").to_string()
}

pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// Goal in milliseconds from hour/minute/second fields.
pub fn hms_to_ms(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours
        .saturating_mul(MS_PER_HOUR)
        .saturating_add(minutes.saturating_mul(MS_PER_MINUTE))
        .saturating_add(seconds.saturating_mul(MS_PER_SECOND))
}

/// Inverse of [`hms_to_ms`], dropping sub-second remainder.
pub fn ms_to_hms(ms: u64) -> (u64, u64, u64) {
    (
        ms / MS_PER_HOUR,
        (ms % MS_PER_HOUR) / MS_PER_MINUTE,
        (ms % MS_PER_MINUTE) / MS_PER_SECOND,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    #[test]
    fn log_format_examples() {
        assert_eq!(format_duration_for_log(0), "0m");
        assert_eq!(format_duration_for_log(90 * 60_000), "1h 30m");
        assert_eq!(format_duration_for_log(59_999), "0m");
        assert_eq!(format_duration_for_log(8 * MS_PER_HOUR), "8h 0m");
    }

    #[test]
    fn live_format_picks_largest_unit() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(42_900), "42s");
        assert_eq!(format_duration(12 * MS_PER_MINUTE + 3_000), "12m 3s");
        assert_eq!(format_duration(7 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 59_000), "7h 5m");
    }

    #[test]
    fn timestamps_format_in_given_zone() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 22, 15, 0).unwrap();
        assert_eq!(format_time(&at), "10:15 PM");
        assert_eq!(format_date(&at), "Mar 1");
        assert_eq!(format_numeric_date(&at), "3/1/2024");

        let morning = Utc.with_ymd_and_hms(2024, 3, 2, 6, 5, 0).unwrap();
        assert_eq!(format_time(&morning), "06:05 AM");
    }

    #[test]
    fn hms_conversions() {
        assert_eq!(hms_to_ms(8, 0, 0), 8 * MS_PER_HOUR);
        assert_eq!(hms_to_ms(0, 10, 30), 630_000);
        assert_eq!(ms_to_hms(hms_to_ms(7, 45, 12)), (7, 45, 12));
        assert_eq!(ms_to_hours(90 * MS_PER_MINUTE), 1.5);
    }

    proptest! {
        #[test]
        fn formatters_are_pure(ms in 0u64..(400 * MS_PER_HOUR)) {
            prop_assert_eq!(format_duration(ms), format_duration(ms));
            prop_assert_eq!(format_duration_for_log(ms), format_duration_for_log(ms));
        }

        #[test]
        fn log_format_never_shows_sixty_minutes(ms in 0u64..(400 * MS_PER_HOUR)) {
            let text = format_duration_for_log(ms);
            let minutes: u64 = text
                .trim_end_matches('m')
                .rsplit(' ')
                .next()
                .and_then(|m| m.parse().ok())
                .unwrap();
            prop_assert!(minutes < 60);
        }
    }
}
