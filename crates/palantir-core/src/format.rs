//! Display formatting for dashboard numbers. All functions are total and use
//! `.` as the decimal separator.

use chrono::{DateTime, Utc};

use crate::bucket::Bucket;

/// Compact integer rendering: `1.5k`, `2.5M`, `15M`, `999`.
///
/// The magnitude picks the scale; the signed value is what gets printed.
/// Thousands always keep one decimal; millions drop it from 10M upward.
pub fn format_compact(n: i64) -> String {
    let abs = n.unsigned_abs();
    if abs >= 1_000_000 {
        let v = n as f64 / 1_000_000.0;
        if v.abs() >= 10.0 {
            format!("{v:.0}M")
        } else {
            format!("{v:.1}M")
        }
    } else if abs >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// `"0%"` for exactly zero, otherwise one decimal and a percent sign.
pub fn format_rate(v: f64) -> String {
    if v == 0.0 {
        return "0%".to_string();
    }
    format!("{v:.1}%")
}

pub fn format_float1(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v:.1}")
}

/// Chart axis label for a bucket start.
pub fn format_bucket_label(t: DateTime<Utc>, bucket: Bucket) -> String {
    match bucket {
        Bucket::Hour => t.format("%b %d %H:00").to_string(),
        Bucket::Day => t.format("%b %d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn compact_scales() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1_500), "1.5k");
        assert_eq!(format_compact(250_000), "250.0k");
        assert_eq!(format_compact(2_500_000), "2.5M");
        assert_eq!(format_compact(15_000_000), "15M");
    }

    #[test]
    fn compact_keeps_sign() {
        assert_eq!(format_compact(-1_500), "-1.5k");
        assert_eq!(format_compact(-42), "-42");
        assert_eq!(format_compact(-12_000_000), "-12M");
    }

    #[test]
    fn rates_and_floats() {
        assert_eq!(format_rate(0.0), "0%");
        assert_eq!(format_rate(33.333), "33.3%");
        assert_eq!(format_float1(0.0), "0");
        assert_eq!(format_float1(2.26), "2.3");
        assert_eq!(format_float1(1.0), "1.0");
    }

    #[test]
    fn bucket_labels() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        assert_eq!(format_bucket_label(t, Bucket::Hour), "Jan 02 15:00");
        assert_eq!(format_bucket_label(t, Bucket::Day), "Jan 02");
    }
}
