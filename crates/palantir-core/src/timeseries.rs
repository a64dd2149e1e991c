use std::collections::HashMap;

use crate::{analytics::TimeBucket, bucket::Bucket, period::Window};

/// Expand a sparse grouped-query result into a complete series.
///
/// The output starts at `window.start` truncated to the bucket boundary and
/// steps by one bucket up to and including `window.end`. Buckets missing from
/// `sparse` are emitted with a zero count; sparse rows whose time does not
/// fall on one of those steps are ignored. If `sparse` repeats a bucket, the
/// last row wins.
pub fn densify(sparse: &[TimeBucket], window: &Window, bucket: Bucket) -> Vec<TimeBucket> {
    let existing: HashMap<i64, i64> = sparse
        .iter()
        .map(|tb| (tb.time.timestamp(), tb.count))
        .collect();

    let start = bucket.truncate(window.start);
    let step = bucket.step();
    let steps = (window.end - start).num_seconds().max(0) / step.num_seconds() + 1;

    let mut series = Vec::with_capacity(usize::try_from(steps).unwrap_or_default());
    let mut t = start;
    while t <= window.end {
        series.push(TimeBucket {
            time: t,
            count: existing.get(&t.timestamp()).copied().unwrap_or(0),
        });
        t += step;
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, h, min, s).unwrap()
    }

    fn tb(time: DateTime<Utc>, count: i64) -> TimeBucket {
        TimeBucket { time, count }
    }

    fn assert_strictly_ascending(series: &[TimeBucket], step: Duration) {
        for pair in series.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, step);
        }
    }

    #[test]
    fn two_day_window_at_day_granularity() {
        let window = Window::new(at(1, 1, 0, 0, 0), at(1, 2, 23, 59, 59));
        let series = densify(&[tb(at(1, 2, 0, 0, 0), 5)], &window, Bucket::Day);
        assert_eq!(
            series,
            vec![tb(at(1, 1, 0, 0, 0), 0), tb(at(1, 2, 0, 0, 0), 5)]
        );
    }

    #[test]
    fn calendar_day_gives_24_hourly_buckets() {
        let window = Window::new(at(3, 10, 0, 0, 0), at(3, 10, 23, 59, 59));
        let sparse = [tb(at(3, 10, 9, 0, 0), 3), tb(at(3, 10, 23, 0, 0), 1)];
        let series = densify(&sparse, &window, Bucket::Hour);

        assert_eq!(series.len(), 24);
        assert_strictly_ascending(&series, Duration::hours(1));
        assert_eq!(series[9].count, 3);
        assert_eq!(series[23].count, 1);
        assert_eq!(series.iter().map(|b| b.count).sum::<i64>(), 4);
    }

    #[test]
    fn unaligned_start_is_truncated() {
        // Seven-day window ending at the end of a day starts at 23:59:59.
        let window = Window::new(at(5, 10, 23, 59, 59), at(5, 17, 23, 59, 59));
        let series = densify(&[tb(at(5, 10, 0, 0, 0), 2)], &window, Bucket::Day);

        assert_eq!(series.len(), 8);
        assert_eq!(series[0], tb(at(5, 10, 0, 0, 0), 2));
        assert_eq!(series[7].time, at(5, 17, 0, 0, 0));
        assert_strictly_ascending(&series, Duration::days(1));
    }

    #[test]
    fn length_matches_step_count_for_many_windows() {
        let cases = [
            (at(1, 1, 0, 0, 0), at(1, 1, 0, 0, 0), Bucket::Hour),
            (at(1, 1, 5, 30, 0), at(1, 3, 5, 29, 59), Bucket::Hour),
            (at(2, 27, 12, 0, 0), at(3, 2, 0, 0, 0), Bucket::Day),
            (at(1, 1, 0, 0, 0), at(1, 31, 23, 59, 59), Bucket::Day),
        ];
        for (start, end, bucket) in cases {
            let window = Window::new(start, end);
            let series = densify(&[], &window, bucket);
            let truncated = bucket.truncate(start);
            let expected = (end - truncated).num_seconds() / bucket.step().num_seconds() + 1;
            assert_eq!(series.len() as i64, expected, "{start}..{end} {bucket:?}");
            assert!(series.iter().all(|b| b.count == 0));
            assert_strictly_ascending(&series, bucket.step());
        }
    }

    #[test]
    fn duplicate_rows_last_write_wins() {
        let window = Window::new(at(1, 1, 0, 0, 0), at(1, 1, 2, 0, 0));
        let sparse = [tb(at(1, 1, 1, 0, 0), 4), tb(at(1, 1, 1, 0, 0), 7)];
        let series = densify(&sparse, &window, Bucket::Hour);
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].count, 7);
    }

    #[test]
    fn rows_outside_the_window_are_dropped() {
        let window = Window::new(at(1, 1, 0, 0, 0), at(1, 1, 1, 0, 0));
        let sparse = [tb(at(1, 5, 0, 0, 0), 9)];
        let series = densify(&sparse, &window, Bucket::Hour);
        assert_eq!(series.iter().map(|b| b.count).sum::<i64>(), 0);
    }
}
