use anyhow::{anyhow, Result};
use chrono::DateTime;

use palantir_core::{
    analytics::{Metric, TimeBucket},
    bucket::Bucket,
    period::Window,
};

use crate::queries::{metric_sql, WindowParams, WINDOW_FILTER};
use crate::DuckDbBackend;

/// Grouped per-bucket counts. Only buckets with activity come back; the
/// dashboard engine fills the gaps.
pub async fn bucketed_count_inner(
    db: &DuckDbBackend,
    website_id: &str,
    metric: Metric,
    bucket: Bucket,
    window: &Window,
) -> Result<Vec<TimeBucket>> {
    let params = WindowParams::new(website_id, window);
    let (event_type, aggregate) = metric_sql(metric);
    let unit = bucket.as_str();

    let sql = format!(
        r#"
        SELECT
            CAST(epoch(date_trunc('{unit}', created_at)) AS BIGINT) AS bucket_start,
            {aggregate} AS n
        FROM events
        WHERE {WINDOW_FILTER}
        GROUP BY bucket_start
        ORDER BY bucket_start
        "#
    );

    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        duckdb::params![params.website_id, params.start, params.end_exclusive, event_type],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    let mut buckets = Vec::new();
    for row in rows {
        let (epoch, count) = row?;
        let time = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| anyhow!("bucket timestamp out of range: {epoch}"))?;
        buckets.push(TimeBucket { time, count });
    }
    Ok(buckets)
}
