pub mod analytics;
pub mod bucket;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod format;
pub mod metrics;
pub mod period;
pub mod timeseries;
