//! Capture timestamp handling.
//!
//! A run is stamped exactly once, at start-up, in Japan Standard Time
//! (UTC+9) regardless of the host's local timezone. The resulting
//! [`CaptureStamp`] is handed to every stage that needs a date or time, so all
//! rows and file names of one run agree.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset of the capture timezone east of UTC, in seconds.
pub const CAPTURE_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The single point in time a run is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStamp(DateTime<FixedOffset>);

impl CaptureStamp {
    /// Read `clock` once and convert it into the capture timezone.
    pub fn capture(clock: &impl Clock) -> Self {
        Self::from_utc(clock.now())
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant.with_timezone(&capture_offset()))
    }

    pub fn local(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// `YYYY-MM-DD`, the `capture_date` column.
    pub fn date_column(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM`, the `capture_time` column.
    pub fn time_column(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// `YYYY_MMDD_cmnt`, the per-day output directory.
    pub fn dir_name(&self) -> String {
        self.0.format("%Y_%m%d_cmnt").to_string()
    }

    /// `YYYY_MMDD_HHMM_cmnt_<genre>.csv`, unique per genre and minute.
    pub fn file_name(&self, genre_code: &str) -> String {
        format!("{}_cmnt_{}.csv", self.0.format("%Y_%m%d_%H%M"), genre_code)
    }
}

fn capture_offset() -> FixedOffset {
    // in range, so the fallback is never taken
    FixedOffset::east_opt(CAPTURE_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> CaptureStamp {
        // 2025-05-05 23:07:41 UTC is 2025-05-06 08:07:41 in Tokyo
        let utc = Utc.with_ymd_and_hms(2025, 5, 5, 23, 7, 41).unwrap();
        CaptureStamp::capture(&FixedClock(utc))
    }

    #[test]
    fn test_capture_is_in_utc_plus_nine() {
        let s = stamp();
        assert_eq!(s.local().offset().local_minus_utc(), 9 * 3600);
        assert_eq!(s.date_column(), "2025-05-06");
        assert_eq!(s.time_column(), "08:07");
    }

    #[test]
    fn test_dir_and_file_names() {
        let s = stamp();
        assert_eq!(s.dir_name(), "2025_0506_cmnt");
        assert_eq!(s.file_name("world"), "2025_0506_0807_cmnt_world.csv");
        assert_eq!(s.file_name("it-science"), "2025_0506_0807_cmnt_it-science.csv");
    }

    #[test]
    fn test_same_minute_same_file_name() {
        let a = CaptureStamp::from_utc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap());
        let b = CaptureStamp::from_utc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 59).unwrap());
        assert_eq!(a.file_name("TTL"), b.file_name("TTL"));
    }
}
