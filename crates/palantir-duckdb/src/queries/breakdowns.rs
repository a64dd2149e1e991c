use anyhow::Result;

use palantir_core::{
    analytics::{BreakdownItem, Dimension, GeoBreakdownItem, GeoDimension},
    event::{EVENT_TYPE_EVENT, EVENT_TYPE_PAGEVIEW},
    period::Window,
};

use crate::queries::{WindowParams, WINDOW_FILTER};
use crate::DuckDbBackend;

/// Column and event type backing each breakdown dimension.
fn dimension_sql(dimension: Dimension) -> (&'static str, &'static str) {
    match dimension {
        Dimension::Page => ("url", EVENT_TYPE_PAGEVIEW),
        Dimension::Referrer => ("referrer", EVENT_TYPE_PAGEVIEW),
        Dimension::Browser => ("browser", EVENT_TYPE_PAGEVIEW),
        Dimension::Os => ("os", EVENT_TYPE_PAGEVIEW),
        Dimension::Device => ("device_type", EVENT_TYPE_PAGEVIEW),
        Dimension::EventName => ("event_name", EVENT_TYPE_EVENT),
    }
}

fn geo_column(dimension: GeoDimension) -> &'static str {
    match dimension {
        GeoDimension::Country => "country_name",
        GeoDimension::City => "city",
    }
}

/// Top-N values of `dimension`, most viewed first. NULL and empty values are
/// skipped; ties are broken by name so the order is stable.
pub async fn breakdown_inner(
    db: &DuckDbBackend,
    website_id: &str,
    dimension: Dimension,
    window: &Window,
) -> Result<Vec<BreakdownItem>> {
    let params = WindowParams::new(website_id, window);
    let (column, event_type) = dimension_sql(dimension);

    let sql = format!(
        r#"
        SELECT {column} AS name, COUNT(*) AS views
        FROM events
        WHERE {WINDOW_FILTER}
          AND {column} IS NOT NULL
          AND {column} <> ''
        GROUP BY name
        ORDER BY views DESC, name ASC
        LIMIT ?5
        "#
    );

    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        duckdb::params![
            params.website_id,
            params.start,
            params.end_exclusive,
            event_type,
            db.breakdown_limit
        ],
        |row| {
            Ok(BreakdownItem {
                name: row.get(0)?,
                views: row.get(1)?,
            })
        },
    )?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Top-N countries or cities over pageviews, each with its country code.
pub async fn geo_breakdown_inner(
    db: &DuckDbBackend,
    website_id: &str,
    dimension: GeoDimension,
    window: &Window,
) -> Result<Vec<GeoBreakdownItem>> {
    let params = WindowParams::new(website_id, window);
    let column = geo_column(dimension);

    let sql = format!(
        r#"
        SELECT {column} AS name, COALESCE(country_code, '') AS code, COUNT(*) AS views
        FROM events
        WHERE {WINDOW_FILTER}
          AND {column} IS NOT NULL
          AND {column} <> ''
        GROUP BY name, code
        ORDER BY views DESC, name ASC
        LIMIT ?5
        "#
    );

    let conn = db.conn.lock().await;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        duckdb::params![
            params.website_id,
            params.start,
            params.end_exclusive,
            EVENT_TYPE_PAGEVIEW,
            db.breakdown_limit
        ],
        |row| {
            Ok(GeoBreakdownItem {
                name: row.get(0)?,
                code: row.get(1)?,
                views: row.get(2)?,
            })
        },
    )?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}
