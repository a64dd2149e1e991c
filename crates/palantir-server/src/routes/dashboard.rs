use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use palantir_core::{
    analytics::{DashboardStats, TimeBucket},
    bucket::Bucket,
    dashboard::compute_dashboard_stats,
    format::{format_bucket_label, format_compact, format_float1, format_rate},
    period::{resolve_period, ResolvedPeriod},
};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub period: Option<String>,
    /// `YYYY-MM-DD`, only read when `period=custom`.
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Headline numbers of the live view, already formatted for display.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveTotals {
    pub visitors: String,
    pub pageviews: String,
    pub views_per_visitor: String,
    pub bounce_rate: String,
    pub visitors_change: i64,
    pub pageviews_change: i64,
    pub vpv_change: i64,
    pub bounce_rate_change: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LiveSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LiveSeriesSet {
    pub pageviews: LiveSeries,
    pub visitors: LiveSeries,
    pub events: LiveSeries,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LivePayload {
    pub totals: LiveTotals,
    pub series: LiveSeriesSet,
    pub last_updated: String,
}

fn whole(change: f64) -> i64 {
    change.round() as i64
}

fn series(points: &[TimeBucket], bucket: Bucket) -> LiveSeries {
    LiveSeries {
        labels: points
            .iter()
            .map(|p| format_bucket_label(p.time, bucket))
            .collect(),
        values: points.iter().map(|p| p.count).collect(),
    }
}

/// Shape a computed stats bundle into the payload the live dashboard polls.
pub fn live_payload(stats: &DashboardStats, bucket: Bucket, now: DateTime<Utc>) -> LivePayload {
    LivePayload {
        totals: LiveTotals {
            visitors: format_compact(stats.total_unique_visitors),
            pageviews: format_compact(stats.total_pageviews),
            views_per_visitor: format_float1(stats.views_per_visitor),
            bounce_rate: format_rate(stats.bounce_rate),
            visitors_change: whole(stats.unique_visitors_change),
            pageviews_change: whole(stats.pageviews_change),
            vpv_change: whole(stats.views_per_visitor_change),
            bounce_rate_change: whole(stats.bounce_rate_change),
        },
        series: LiveSeriesSet {
            pageviews: series(&stats.pageviews_over_time, bucket),
            visitors: series(&stats.visitors_over_time, bucket),
            events: series(&stats.events_over_time, bucket),
        },
        last_updated: now.format("%H:%M:%S UTC").to_string(),
    }
}

struct Loaded {
    resolved: ResolvedPeriod,
    bucket: Bucket,
    stats: DashboardStats,
    now: DateTime<Utc>,
}

async fn load(
    state: &AppState,
    website_id: &str,
    query: &DashboardQuery,
) -> Result<Loaded, AppError> {
    let exists = state
        .db
        .website_exists(website_id)
        .await
        .map_err(AppError::Internal)?;
    if !exists {
        return Err(AppError::NotFound("Website not found".to_string()));
    }

    let now = state.clock.now();
    let resolved = resolve_period(
        query.period.as_deref(),
        query.start.as_deref(),
        query.end.as_deref(),
        now,
    );
    let bucket = Bucket::for_window(&resolved.current);

    let stats = compute_dashboard_stats(
        state.analytics.as_ref(),
        website_id,
        &resolved.current,
        &resolved.previous,
        bucket,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Loaded {
        resolved,
        bucket,
        stats,
        now,
    })
}

/// `GET /api/websites/{id}/dashboard`: Full stats bundle for the period.
#[tracing::instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let loaded = load(&state, &website_id, &query).await?;

    Ok(Json(json!({
        "data": {
            "website_id": website_id,
            "period": loaded.resolved.period,
            "current": loaded.resolved.current,
            "previous": loaded.resolved.previous,
            "bucket": loaded.bucket,
            "stats": loaded.stats,
        }
    })))
}

/// `GET /api/websites/{id}/dashboard/live`: Formatted totals and chart series.
#[tracing::instrument(skip(state))]
pub async fn get_dashboard_live(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let loaded = load(&state, &website_id, &query).await?;
    let payload = live_payload(&loaded.stats, loaded.bucket, loaded.now);

    Ok(Json(json!({ "dashboard": payload })))
}
