pub mod breakdowns;
pub mod series;
pub mod totals;

use chrono::Duration;

use palantir_core::{
    analytics::Metric,
    event::{EVENT_TYPE_EVENT, EVENT_TYPE_PAGEVIEW},
    period::Window,
};

use crate::backend::sql_timestamp;

/// Bound parameters shared by every dashboard query:
/// `?1` website id, `?2` window start, `?3` exclusive end.
///
/// Windows are inclusive at one-second resolution, so the exclusive end is
/// one second past `window.end`. That keeps sub-second timestamps in the
/// final second inside the window.
pub(crate) struct WindowParams {
    pub website_id: String,
    pub start: String,
    pub end_exclusive: String,
}

impl WindowParams {
    pub fn new(website_id: &str, window: &Window) -> Self {
        Self {
            website_id: website_id.to_string(),
            start: sql_timestamp(window.start),
            end_exclusive: sql_timestamp(window.end + Duration::seconds(1)),
        }
    }
}

/// Shared `WHERE` clause for [`WindowParams`] plus an event type at `?4`.
pub(crate) const WINDOW_FILTER: &str = "website_id = ?1 \
     AND created_at >= CAST(?2 AS TIMESTAMP) \
     AND created_at < CAST(?3 AS TIMESTAMP) \
     AND event_type = ?4";

/// Event type a metric counts and the aggregate that counts it.
pub(crate) fn metric_sql(metric: Metric) -> (&'static str, &'static str) {
    match metric {
        Metric::Pageviews => (EVENT_TYPE_PAGEVIEW, "COUNT(*)"),
        Metric::UniqueVisitors => (EVENT_TYPE_PAGEVIEW, "COUNT(DISTINCT visitor_id)"),
        Metric::Events => (EVENT_TYPE_EVENT, "COUNT(*)"),
    }
}
