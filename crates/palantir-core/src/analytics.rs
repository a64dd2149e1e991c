//! Analytics backend abstraction and the dashboard result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{bucket::Bucket, period::Window};

/// One point of a time series, aligned to its bucket start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub time: DateTime<Utc>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub name: String,
    pub views: i64,
}

/// A breakdown row that also carries the ISO country code, so the UI can
/// render a flag next to a country or city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoBreakdownItem {
    pub name: String,
    pub code: String,
    pub views: i64,
}

/// Countable quantities for totals and bucketed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Pageviews,
    /// Distinct visitors among pageviews.
    UniqueVisitors,
    /// Custom (non-pageview) events.
    Events,
}

/// Dimensions for ranked breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Page,
    Referrer,
    Browser,
    Os,
    Device,
    EventName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoDimension {
    Country,
    City,
}

/// Everything the dashboard renders for one website and window.
///
/// Built fresh per request by [`crate::dashboard::compute_dashboard_stats`]
/// and never mutated afterwards. Every series covers the same window at the
/// same bucket granularity with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_pageviews: i64,
    pub total_unique_visitors: i64,
    pub bounce_count: i64,
    pub views_per_visitor: f64,
    /// Percentage, 0–100 under normal inputs.
    pub bounce_rate: f64,

    // Percent change vs the previous period.
    pub pageviews_change: f64,
    pub unique_visitors_change: f64,
    pub views_per_visitor_change: f64,
    /// Sign-flipped: a falling bounce rate is reported as a positive change.
    pub bounce_rate_change: f64,

    pub pageviews_over_time: Vec<TimeBucket>,
    pub visitors_over_time: Vec<TimeBucket>,
    pub events_over_time: Vec<TimeBucket>,

    pub top_pages: Vec<BreakdownItem>,
    pub top_referrers: Vec<BreakdownItem>,
    pub browsers: Vec<BreakdownItem>,
    pub oses: Vec<BreakdownItem>,
    pub devices: Vec<BreakdownItem>,
    pub top_countries: Vec<GeoBreakdownItem>,
    pub top_cities: Vec<GeoBreakdownItem>,
    pub top_events: Vec<BreakdownItem>,
}

/// Aggregate queries the dashboard engine needs from storage.
///
/// Implementations own indexing, top-N limits and connection handling. Every
/// method is read-only and independent of the others, so callers are free to
/// run them concurrently.
#[async_trait::async_trait]
pub trait AnalyticsBackend: Send + Sync + 'static {
    async fn total_count(
        &self,
        website_id: &str,
        metric: Metric,
        window: &Window,
    ) -> anyhow::Result<i64>;

    /// Visitors with exactly one pageview inside `window`.
    async fn bounce_count(&self, website_id: &str, window: &Window) -> anyhow::Result<i64>;

    /// Sparse per-bucket counts: buckets without activity are omitted, and
    /// there is at most one row per bucket start.
    async fn bucketed_count(
        &self,
        website_id: &str,
        metric: Metric,
        bucket: Bucket,
        window: &Window,
    ) -> anyhow::Result<Vec<TimeBucket>>;

    /// Ranked descending by count.
    async fn breakdown(
        &self,
        website_id: &str,
        dimension: Dimension,
        window: &Window,
    ) -> anyhow::Result<Vec<BreakdownItem>>;

    async fn geo_breakdown(
        &self,
        website_id: &str,
        dimension: GeoDimension,
        window: &Window,
    ) -> anyhow::Result<Vec<GeoBreakdownItem>>;
}
