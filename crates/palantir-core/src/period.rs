//! Period resolution: turn a dashboard period keyword (or an explicit custom
//! date range) into absolute UTC windows.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` range of UTC instants, at one-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Build a window, swapping the bounds if they arrive reversed.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The immediately preceding window of identical duration, or `None` when
    /// it would fall before the earliest representable instant.
    ///
    /// It ends one second before `start`, so the two never overlap.
    pub fn checked_previous(&self) -> Option<Self> {
        let prev_end = self.start.checked_sub_signed(Duration::seconds(1))?;
        let prev_start = prev_end.checked_sub_signed(self.duration())?;
        Some(Self {
            start: prev_start,
            end: prev_end,
        })
    }

    /// Like [`Window::checked_previous`], clamped to `DateTime::<Utc>::MIN_UTC`.
    pub fn previous(&self) -> Self {
        self.checked_previous().unwrap_or_else(|| {
            let end = self
                .start
                .checked_sub_signed(Duration::seconds(1))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            Self {
                start: DateTime::<Utc>::MIN_UTC,
                end,
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// The current UTC calendar day.
    Today,
    #[default]
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    Month,
    Custom,
}

impl Period {
    /// Parse a period keyword. Anything unrecognised (including empty) maps to
    /// the 7-day default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("today") => Self::Today,
            Some("30d") => Self::Last30Days,
            Some("month") => Self::Month,
            Some("custom") => Self::Custom,
            _ => Self::Last7Days,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Month => "month",
            Self::Custom => "custom",
        }
    }
}

/// Outcome of period resolution: the period actually applied (custom ranges
/// that fail to parse come back as the default) and its windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPeriod {
    pub period: Period,
    pub current: Window,
    pub previous: Window,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    start_of_day(date)
        .checked_add_signed(Duration::days(1))?
        .checked_sub_signed(Duration::seconds(1))
}

/// Custom dates outside these years are treated as malformed.
const CUSTOM_YEARS: std::ops::RangeInclusive<i32> = 1970..=9999;

/// Longest custom range, in days, before it is treated as malformed.
const MAX_CUSTOM_DAYS: i64 = 3_660;

fn parse_day(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| CUSTOM_YEARS.contains(&date.year()))
}

/// The whole-day window for a custom range, if both days parse and the range
/// and its comparison window are representable.
fn custom_window(custom_start: Option<&str>, custom_end: Option<&str>) -> Option<Window> {
    let (mut first, mut last) = (parse_day(custom_start)?, parse_day(custom_end)?);
    if first > last {
        std::mem::swap(&mut first, &mut last);
    }
    if (last - first).num_days() >= MAX_CUSTOM_DAYS {
        return None;
    }
    let window = Window::new(start_of_day(first), end_of_day(last)?);
    window.checked_previous()?;
    Some(window)
}

/// Resolve the current window for `period` relative to `now`.
///
/// `custom_start`/`custom_end` are `YYYY-MM-DD` strings and are only read for
/// [`Period::Custom`]. A custom range with a missing, malformed or
/// out-of-range date falls back to the default 7-day window instead of failing.
pub fn resolve_window(
    period: Period,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    now: DateTime<Utc>,
) -> (Period, Window) {
    if period == Period::Custom {
        if let Some(window) = custom_window(custom_start, custom_end) {
            return (Period::Custom, window);
        }
    }

    let today = now.date_naive();
    let end = end_of_day(today).unwrap_or(DateTime::<Utc>::MAX_UTC);
    let days_back = |n: i64| {
        end.checked_sub_signed(Duration::days(n))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    };

    match period {
        Period::Today => (Period::Today, Window::new(start_of_day(today), end)),
        Period::Last30Days => (Period::Last30Days, Window::new(days_back(30), end)),
        Period::Month => {
            let first = today.with_day(1).unwrap_or(today);
            (Period::Month, Window::new(start_of_day(first), end))
        }
        Period::Last7Days | Period::Custom => (Period::Last7Days, Window::new(days_back(7), end)),
    }
}

/// Parse the raw query parameters and resolve both the current and the
/// comparison window.
pub fn resolve_period(
    raw_period: Option<&str>,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    now: DateTime<Utc>,
) -> ResolvedPeriod {
    let (period, current) = resolve_window(Period::parse(raw_period), custom_start, custom_end, now);
    ResolvedPeriod {
        period,
        current,
        previous: current.previous(),
    }
}
