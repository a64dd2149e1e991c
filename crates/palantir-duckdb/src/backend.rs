use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use palantir_core::event::Event;

use crate::schema::init_sql;

/// Breakdown row limit used when the caller does not configure one.
pub const DEFAULT_BREAKDOWN_LIMIT: i64 = 10;

/// Render a UTC instant the way DuckDB parses a naive `TIMESTAMP`.
pub(crate) fn sql_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// A DuckDB backend for Palantir.
///
/// DuckDB is single-writer, so the connection lives behind an async mutex.
/// Cloning the inner `Arc` is cheap; the struct itself is shared across axum
/// handlers through `AppState`.
///
/// Memory and thread limits are enforced by [`init_sql`] at open time.
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) breakdown_limit: i64,
}

impl DuckDbBackend {
    /// Open (or create) a DuckDB database file at `path`.
    ///
    /// `memory_limit` is a DuckDB size string such as `"1GB"` or `"512MB"`.
    /// Runs the schema init SQL so all tables and indexes exist.
    pub fn open(path: &str, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            breakdown_limit: DEFAULT_BREAKDOWN_LIMIT,
        })
    }

    /// Open an **in-memory** DuckDB database.
    ///
    /// Intended for tests: data is discarded when the struct is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            breakdown_limit: DEFAULT_BREAKDOWN_LIMIT,
        })
    }

    /// Override the top-N limit for breakdown queries.
    pub fn with_breakdown_limit(mut self, limit: i64) -> Self {
        self.breakdown_limit = limit.max(1);
        self
    }

    /// Insert a batch of events in a single transaction.
    ///
    /// Returns immediately (no-op) if `events` is empty.
    pub async fn insert_events(&self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;

        // One transaction for the whole batch: one fsync instead of N.
        let tx = conn.transaction()?;

        for event in events {
            tx.execute(
                r#"INSERT INTO events (
                    id, website_id, event_type, url, referrer,
                    event_name, event_data, visitor_id,
                    browser, os, device_type,
                    language, screen_width,
                    country_code, country_name, city, region,
                    created_at
                ) VALUES (
                    ?1,  ?2,  ?3,  ?4,  ?5,
                    ?6,  ?7,  ?8,
                    ?9,  ?10, ?11,
                    ?12, ?13,
                    ?14, ?15, ?16, ?17,
                    ?18
                )"#,
                duckdb::params![
                    event.id,
                    event.website_id,
                    event.event_type,
                    event.url,
                    event.referrer,
                    event.event_name,
                    event.event_data,
                    event.visitor_id,
                    event.browser,
                    event.os,
                    event.device,
                    event.language,
                    event.screen_width,
                    event.country_code,
                    event.country_name,
                    event.city,
                    event.region,
                    sql_timestamp(event.created_at),
                ],
            )?;
        }

        tx.commit()?;
        info!("Inserted {} events into DuckDB", events.len());
        Ok(())
    }

    /// Return `true` if a website with the given id exists.
    pub async fn website_exists(&self, website_id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM websites WHERE id = ?1")?;
        let count: i64 = stmt.query_row(duckdb::params![website_id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Execute `SELECT 1` as a lightweight liveness check for `/health`.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Insert or update a website row with a fixed id.
    ///
    /// Intended for test fixtures. Safe to call repeatedly with the same `id`.
    pub async fn seed_website(&self, id: &str, domain: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO websites (id, name, domain, created_at, updated_at)
               VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
               ON CONFLICT (id) DO UPDATE SET domain = EXCLUDED.domain"#,
            duckdb::params![id, domain, domain],
        )?;
        Ok(())
    }
}
