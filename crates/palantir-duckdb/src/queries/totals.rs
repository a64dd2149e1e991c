use anyhow::Result;

use palantir_core::{analytics::Metric, event::EVENT_TYPE_PAGEVIEW, period::Window};

use crate::queries::{metric_sql, WindowParams, WINDOW_FILTER};
use crate::DuckDbBackend;

pub async fn total_count_inner(
    db: &DuckDbBackend,
    website_id: &str,
    metric: Metric,
    window: &Window,
) -> Result<i64> {
    let params = WindowParams::new(website_id, window);
    let (event_type, aggregate) = metric_sql(metric);

    let sql = format!("SELECT {aggregate} FROM events WHERE {WINDOW_FILTER}");

    let conn = db.conn.lock().await;
    let count: i64 = conn.prepare(&sql)?.query_row(
        duckdb::params![params.website_id, params.start, params.end_exclusive, event_type],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Visitors whose only pageview in the window is a single one.
///
/// Per-visitor counts go through a CTE; DuckDB does not support the
/// correlated-subquery form.
pub async fn bounce_count_inner(
    db: &DuckDbBackend,
    website_id: &str,
    window: &Window,
) -> Result<i64> {
    let params = WindowParams::new(website_id, window);

    let sql = format!(
        r#"
        WITH per_visitor AS (
            SELECT visitor_id, COUNT(*) AS views
            FROM events
            WHERE {WINDOW_FILTER}
            GROUP BY visitor_id
        )
        SELECT COUNT(*) FROM per_visitor WHERE views = 1
        "#
    );

    let conn = db.conn.lock().await;
    let count: i64 = conn.prepare(&sql)?.query_row(
        duckdb::params![
            params.website_id,
            params.start,
            params.end_exclusive,
            EVENT_TYPE_PAGEVIEW
        ],
        |row| row.get(0),
    )?;
    Ok(count)
}
