//! Timestamp utilities and the clock capability
//!
//! The pipeline only needs wall-clock time for two things: the year filter on
//! the music-summaries query and token expiry checks. Both go through [`Clock`]
//! so tests can pin the date.

use chrono::{DateTime, Datelike, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to whole hours, rounded to nearest
pub fn millis_to_rounded_hours(millis: f64) -> i64 {
    (millis / (1000.0 * 60.0 * 60.0)).round() as i64
}

/// Convert milliseconds to whole minutes, rounded to nearest
pub fn millis_to_rounded_minutes(millis: f64) -> i64 {
    (millis / (1000.0 * 60.0)).round() as i64
}

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    /// Current UTC timestamp
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar year (UTC)
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_fixed_clock_year() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
        assert_eq!(clock.current_year(), 2024);
        assert_eq!(clock.now().month(), 12);
    }

    #[test]
    fn test_system_clock_year_is_plausible() {
        let year = SystemClock.current_year();
        assert!((2000..2100).contains(&year));
    }

    #[test]
    fn test_rounded_hours() {
        assert_eq!(millis_to_rounded_hours(0.0), 0);
        assert_eq!(millis_to_rounded_hours(3_600_000.0), 1);
        // 1.5 hours rounds away from zero
        assert_eq!(millis_to_rounded_hours(5_400_000.0), 2);
        assert_eq!(millis_to_rounded_hours(1_700_000.0), 0);
    }

    #[test]
    fn test_rounded_minutes() {
        assert_eq!(millis_to_rounded_minutes(0.0), 0);
        assert_eq!(millis_to_rounded_minutes(60_000.0), 1);
        assert_eq!(millis_to_rounded_minutes(700_000.0), 12);
    }
}
