use crate::error::CoreError;

/// Process configuration, loaded once at startup and passed explicitly to
/// whoever needs it. Nothing in the engine reads the environment itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    /// DuckDB `memory_limit` size string, e.g. `"1GB"` or `"512MB"`.
    pub duckdb_memory_limit: String,
    /// Externally visible base URL, `{protocol}://{domain}`.
    pub public_url: String,
    pub service_name: String,
    /// Top-N row limit applied to every dashboard breakdown.
    pub breakdown_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, CoreError> {
        let protocol = std::env::var("PALANTIR_PROTOCOL").unwrap_or_else(|_| "http".to_string());
        let domain =
            std::env::var("PALANTIR_DOMAIN").unwrap_or_else(|_| "localhost:3000".to_string());

        let breakdown_limit: i64 = std::env::var("PALANTIR_BREAKDOWN_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| CoreError::InvalidConfig {
                key: "PALANTIR_BREAKDOWN_LIMIT",
                reason: format!("{e}"),
            })?;
        if !(1..=100).contains(&breakdown_limit) {
            return Err(CoreError::InvalidConfig {
                key: "PALANTIR_BREAKDOWN_LIMIT",
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(Self {
            port: std::env::var("PALANTIR_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| CoreError::InvalidConfig {
                    key: "PALANTIR_PORT",
                    reason: format!("{e}"),
                })?,
            data_dir: std::env::var("PALANTIR_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            duckdb_memory_limit: std::env::var("PALANTIR_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            public_url: format!("{protocol}://{domain}"),
            service_name: std::env::var("PALANTIR_SERVICE_NAME")
                .unwrap_or_else(|_| "palantir".to_string()),
            breakdown_limit,
        })
    }
}
