//! Dashboard statistics aggregation.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use crate::{
    analytics::{AnalyticsBackend, DashboardStats, Dimension, GeoDimension, Metric},
    bucket::Bucket,
    metrics,
    period::Window,
    timeseries::densify,
};

/// Run every dashboard query for `website_id` and assemble the result.
///
/// Totals and bounce counts are fetched for both windows; series and
/// breakdowns for `current` only. All queries are issued concurrently and
/// joined before returning. The first failure cancels the rest and is returned
/// as-is, so callers get either a complete bundle or an error.
pub async fn compute_dashboard_stats(
    backend: &dyn AnalyticsBackend,
    website_id: &str,
    current: &Window,
    previous: &Window,
    bucket: Bucket,
) -> Result<DashboardStats> {
    let started = Instant::now();

    let (
        total,
        total_unique,
        bounce,
        prev_total,
        prev_unique,
        prev_bounce,
        pageview_rows,
        visitor_rows,
        event_rows,
        top_pages,
        top_referrers,
        browsers,
        oses,
        devices,
        top_events,
        top_countries,
        top_cities,
    ) = tokio::try_join!(
        backend.total_count(website_id, Metric::Pageviews, current),
        backend.total_count(website_id, Metric::UniqueVisitors, current),
        backend.bounce_count(website_id, current),
        backend.total_count(website_id, Metric::Pageviews, previous),
        backend.total_count(website_id, Metric::UniqueVisitors, previous),
        backend.bounce_count(website_id, previous),
        backend.bucketed_count(website_id, Metric::Pageviews, bucket, current),
        backend.bucketed_count(website_id, Metric::UniqueVisitors, bucket, current),
        backend.bucketed_count(website_id, Metric::Events, bucket, current),
        backend.breakdown(website_id, Dimension::Page, current),
        backend.breakdown(website_id, Dimension::Referrer, current),
        backend.breakdown(website_id, Dimension::Browser, current),
        backend.breakdown(website_id, Dimension::Os, current),
        backend.breakdown(website_id, Dimension::Device, current),
        backend.breakdown(website_id, Dimension::EventName, current),
        backend.geo_breakdown(website_id, GeoDimension::Country, current),
        backend.geo_breakdown(website_id, GeoDimension::City, current),
    )?;

    let views_per_visitor = metrics::views_per_visitor(total, total_unique);
    let prev_views_per_visitor = metrics::views_per_visitor(prev_total, prev_unique);
    let bounce_rate = metrics::bounce_rate(bounce, total_unique);
    let prev_bounce_rate = metrics::bounce_rate(prev_bounce, prev_unique);

    let stats = DashboardStats {
        total_pageviews: total,
        total_unique_visitors: total_unique,
        bounce_count: bounce,
        views_per_visitor,
        bounce_rate,
        pageviews_change: metrics::count_change(prev_total, total),
        unique_visitors_change: metrics::count_change(prev_unique, total_unique),
        views_per_visitor_change: metrics::percent_change(prev_views_per_visitor, views_per_visitor),
        bounce_rate_change: metrics::bounce_rate_change(prev_bounce_rate, bounce_rate),
        pageviews_over_time: densify(&pageview_rows, current, bucket),
        visitors_over_time: densify(&visitor_rows, current, bucket),
        events_over_time: densify(&event_rows, current, bucket),
        top_pages,
        top_referrers,
        browsers,
        oses,
        devices,
        top_countries,
        top_cities,
        top_events,
    };

    debug!(
        website_id,
        bucket = bucket.as_str(),
        points = stats.pageviews_over_time.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dashboard stats computed"
    );

    Ok(stats)
}
