use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use crate::period::Window;

/// Time-series granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Hour,
    Day,
}

impl Bucket {
    /// Pick the granularity for `window`: hourly up to 48h inclusive, daily
    /// beyond that. The previous window always reuses the current window's
    /// choice.
    pub fn for_window(window: &Window) -> Self {
        if window.duration() <= Duration::hours(48) {
            Self::Hour
        } else {
            Self::Day
        }
    }

    /// The `date_trunc` unit and wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }

    pub fn step(&self) -> Duration {
        match self {
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::days(1),
        }
    }

    /// Round `t` down to the start of its bucket.
    pub fn truncate(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        // Only fails for steps that do not fit in i64 nanoseconds.
        t.duration_trunc(self.step()).unwrap_or(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, m, s).unwrap()
    }

    #[test]
    fn up_to_48_hours_is_hourly() {
        let exactly = Window::new(at(1, 0, 0, 0), at(3, 0, 0, 0));
        assert_eq!(Bucket::for_window(&exactly), Bucket::Hour);

        let two_calendar_days = Window::new(at(1, 0, 0, 0), at(2, 23, 59, 59));
        assert_eq!(Bucket::for_window(&two_calendar_days), Bucket::Hour);

        let empty = Window::new(at(1, 0, 0, 0), at(1, 0, 0, 0));
        assert_eq!(Bucket::for_window(&empty), Bucket::Hour);
    }

    #[test]
    fn longer_than_48_hours_is_daily() {
        let just_over = Window::new(at(1, 0, 0, 0), at(3, 0, 0, 1));
        assert_eq!(Bucket::for_window(&just_over), Bucket::Day);

        let week = Window::new(at(1, 0, 0, 0), at(8, 0, 0, 0));
        assert_eq!(Bucket::for_window(&week), Bucket::Day);
    }

    #[test]
    fn truncate_zeroes_sub_bucket_fields() {
        let t = at(5, 13, 47, 12);
        assert_eq!(Bucket::Hour.truncate(t), at(5, 13, 0, 0));
        assert_eq!(Bucket::Day.truncate(t), at(5, 0, 0, 0));
    }
}
