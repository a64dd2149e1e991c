use std::sync::Arc;

use palantir_core::{
    analytics::AnalyticsBackend,
    clock::{Clock, SystemClock},
    config::Config,
};
use palantir_duckdb::DuckDbBackend;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// Every dependency the dashboard engine needs (storage, clock, config) is
/// held here explicitly; handlers pass them down as parameters.
pub struct AppState {
    /// The DuckDB backend, used directly for website management.
    pub db: Arc<DuckDbBackend>,

    /// The same backend seen through the aggregate-query trait the dashboard
    /// engine consumes.
    pub analytics: Arc<dyn AnalyticsBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Source of "now" for period resolution and live-payload timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Construct a new `AppState` wrapping the given backend and config,
    /// reading time from the system clock.
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        let db = Arc::new(db.with_breakdown_limit(config.breakdown_limit));
        Self {
            analytics: db.clone(),
            db,
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock, e.g. with a `FixedClock` in tests.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}
