use async_trait::async_trait;

use palantir_core::{
    analytics::{
        AnalyticsBackend, BreakdownItem, Dimension, GeoBreakdownItem, GeoDimension, Metric,
        TimeBucket,
    },
    bucket::Bucket,
    period::Window,
};

use crate::queries::{breakdowns, series, totals};
use crate::DuckDbBackend;

#[async_trait]
impl AnalyticsBackend for DuckDbBackend {
    async fn total_count(
        &self,
        website_id: &str,
        metric: Metric,
        window: &Window,
    ) -> anyhow::Result<i64> {
        totals::total_count_inner(self, website_id, metric, window).await
    }

    async fn bounce_count(&self, website_id: &str, window: &Window) -> anyhow::Result<i64> {
        totals::bounce_count_inner(self, website_id, window).await
    }

    async fn bucketed_count(
        &self,
        website_id: &str,
        metric: Metric,
        bucket: Bucket,
        window: &Window,
    ) -> anyhow::Result<Vec<TimeBucket>> {
        series::bucketed_count_inner(self, website_id, metric, bucket, window).await
    }

    async fn breakdown(
        &self,
        website_id: &str,
        dimension: Dimension,
        window: &Window,
    ) -> anyhow::Result<Vec<BreakdownItem>> {
        breakdowns::breakdown_inner(self, website_id, dimension, window).await
    }

    async fn geo_breakdown(
        &self,
        website_id: &str,
        dimension: GeoDimension,
        window: &Window,
    ) -> anyhow::Result<Vec<GeoBreakdownItem>> {
        breakdowns::geo_breakdown_inner(self, website_id, dimension, window).await
    }
}
