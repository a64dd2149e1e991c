/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup.
///
/// `memory_limit` comes from `Config.duckdb_memory_limit`
/// (env `PALANTIR_DUCKDB_MEMORY`, default `"1GB"`). Always set an explicit
/// limit: the DuckDB default of 80% of system RAM is too much for a server
/// process.
///
/// There is no FOREIGN KEY from `events.website_id` to `websites.id`; deleting
/// a website removes its events first, inside one transaction.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- WEBSITES
-- ===========================================
CREATE TABLE IF NOT EXISTS websites (
    id              VARCHAR PRIMARY KEY,           -- 'site_' + 10 alphanumerics
    name            VARCHAR NOT NULL,
    domain          VARCHAR NOT NULL,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===========================================
-- EVENTS (pageviews and custom events)
-- ===========================================
CREATE TABLE IF NOT EXISTS events (
    id              VARCHAR NOT NULL,              -- UUID v4
    website_id      VARCHAR NOT NULL,
    event_type      VARCHAR NOT NULL,              -- 'pageview' | 'event'
    url             VARCHAR NOT NULL,
    referrer        VARCHAR,
    event_name      VARCHAR,                       -- custom events only
    event_data      VARCHAR,                       -- JSON string (nullable)
    visitor_id      VARCHAR NOT NULL,

    -- User agent
    browser         VARCHAR,
    os              VARCHAR,
    device_type     VARCHAR,                       -- 'desktop' | 'mobile' | 'tablet'

    -- Client
    language        VARCHAR,
    screen_width    INTEGER,

    -- Geo
    country_code    VARCHAR(2),                    -- ISO 3166-1 alpha-2
    country_name    VARCHAR,
    city            VARCHAR,
    region          VARCHAR,

    created_at      TIMESTAMP NOT NULL
);

-- Primary query pattern: website + type + time range
CREATE INDEX IF NOT EXISTS idx_events_type_date
    ON events(website_id, event_type, created_at);

-- Bounce counting groups pageviews per visitor
CREATE INDEX IF NOT EXISTS idx_events_visitor
    ON events(website_id, visitor_id, created_at);
"#
    )
}
