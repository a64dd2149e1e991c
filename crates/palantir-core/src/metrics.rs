//! Derived dashboard metrics.
//!
//! Zero denominators and zero baselines resolve to fixed values instead of
//! NaN or infinity. Nothing here rounds; presentation rounding lives in
//! [`crate::format`].

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

pub fn views_per_visitor(pageviews: i64, unique_visitors: i64) -> f64 {
    ratio(pageviews, unique_visitors)
}

/// Bounced visitors as a percentage of unique visitors.
pub fn bounce_rate(bounce_count: i64, unique_visitors: i64) -> f64 {
    ratio(bounce_count.saturating_mul(100), unique_visitors)
}

/// Relative change from `prev` to `current`, in percent.
///
/// A zero baseline yields 0 when nothing changed and a flat +100 when the
/// metric went from nothing to something.
pub fn percent_change(prev: f64, current: f64) -> f64 {
    if prev == 0.0 {
        return if current == 0.0 { 0.0 } else { 100.0 };
    }
    (current - prev) / prev * 100.0
}

pub fn count_change(prev: i64, current: i64) -> f64 {
    percent_change(prev as f64, current as f64)
}

/// Percent change of the bounce rate with the sign flipped, so a falling
/// bounce rate reads as an improvement.
pub fn bounce_rate_change(prev_rate: f64, current_rate: f64) -> f64 {
    let change = percent_change(prev_rate, current_rate);
    if change == 0.0 {
        0.0
    } else {
        -change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_by_zero_is_zero() {
        for n in [0, 1, -5, i64::MAX] {
            let r = ratio(n, 0);
            assert_eq!(r, 0.0);
            assert!(r.is_finite());
        }
        assert_eq!(ratio(3, 2), 1.5);
    }

    #[test]
    fn bounce_rate_is_a_percentage() {
        assert_eq!(bounce_rate(1, 4), 25.0);
        assert_eq!(bounce_rate(0, 0), 0.0);
        assert_eq!(views_per_visitor(50, 20), 2.5);
    }

    #[test]
    fn zero_baseline_conventions() {
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 50.0), 100.0);
        assert_eq!(count_change(0, 50), 100.0);
        assert_eq!(count_change(0, 1_000_000), 100.0);
    }

    #[test]
    fn regular_percent_change() {
        assert_eq!(count_change(100, 150), 50.0);
        assert_eq!(count_change(200, 100), -50.0);
        assert_eq!(percent_change(40.0, 30.0), -25.0);
    }

    #[test]
    fn bounce_rate_change_is_sign_flipped() {
        assert_eq!(bounce_rate_change(40.0, 30.0), 25.0);
        assert!(bounce_rate_change(30.0, 40.0) < 0.0);
        assert!(bounce_rate_change(50.0, 10.0) > 0.0);
    }

    #[test]
    fn unchanged_bounce_rate_is_positive_zero() {
        let change = bounce_rate_change(0.0, 0.0);
        assert_eq!(change, 0.0);
        assert!(change.is_sign_positive());
        assert!(bounce_rate_change(20.0, 20.0).is_sign_positive());
    }
}
