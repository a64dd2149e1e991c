use anyhow::Result;
use serde::Serialize;

use crate::DuckDbBackend;

#[derive(Debug, Clone, Serialize)]
pub struct Website {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateWebsiteParams {
    pub name: String,
    pub domain: String,
}

pub struct UpdateWebsiteParams {
    pub name: Option<String>,
    pub domain: Option<String>,
}

const SELECT_WEBSITE: &str = "SELECT id, name, domain, CAST(created_at AS VARCHAR), \
     CAST(updated_at AS VARCHAR) FROM websites";

fn row_to_website(row: &duckdb::Row<'_>) -> duckdb::Result<Website> {
    Ok(Website {
        id: row.get(0)?,
        name: row.get(1)?,
        domain: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Generate a website ID: "site_" + 10 random lowercase alphanumerics.
fn generate_website_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let chars: String = (0..10)
        .map(|_| {
            let idx = rng.gen_range(0..36u8);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect();
    format!("site_{}", chars)
}

impl DuckDbBackend {
    pub async fn create_website(&self, params: CreateWebsiteParams) -> Result<Website> {
        let conn = self.conn.lock().await;
        let id = generate_website_id();

        conn.execute(
            "INSERT INTO websites (id, name, domain, created_at, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.name, params.domain],
        )?;

        // Read back the created row to get timestamps.
        let website = conn
            .prepare(&format!("{SELECT_WEBSITE} WHERE id = ?1"))?
            .query_row(duckdb::params![id], row_to_website)?;

        Ok(website)
    }

    /// Cursor-paginated listing ordered by id.
    ///
    /// Returns the page, the total number of websites and whether more rows
    /// follow the page.
    pub async fn list_websites(
        &self,
        limit: i64,
        cursor: Option<&str>,
    ) -> Result<(Vec<Website>, i64, bool)> {
        let conn = self.conn.lock().await;

        let total: i64 = conn
            .prepare("SELECT COUNT(*) FROM websites")?
            .query_row([], |row| row.get(0))?;

        let mut websites = Vec::new();
        if let Some(cursor) = cursor {
            let mut stmt =
                conn.prepare(&format!("{SELECT_WEBSITE} WHERE id > ?1 ORDER BY id LIMIT ?2"))?;
            for row in stmt.query_map(duckdb::params![cursor, limit], row_to_website)? {
                websites.push(row?);
            }
        } else {
            let mut stmt = conn.prepare(&format!("{SELECT_WEBSITE} ORDER BY id LIMIT ?1"))?;
            for row in stmt.query_map(duckdb::params![limit], row_to_website)? {
                websites.push(row?);
            }
        }

        let has_more = if let Some(last) = websites.last() {
            let remaining: i64 = conn
                .prepare("SELECT COUNT(*) FROM websites WHERE id > ?1")?
                .query_row(duckdb::params![last.id], |row| row.get(0))?;
            remaining > 0
        } else {
            false
        };

        Ok((websites, total, has_more))
    }

    pub async fn get_website(&self, id: &str) -> Result<Option<Website>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("{SELECT_WEBSITE} WHERE id = ?1"))?;
        match stmt.query_row(duckdb::params![id], row_to_website) {
            Ok(website) => Ok(Some(website)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update_website(
        &self,
        id: &str,
        params: UpdateWebsiteParams,
    ) -> Result<Option<Website>> {
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM websites WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(None);
        }

        if let Some(ref name) = params.name {
            conn.execute(
                "UPDATE websites SET name = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![name, id],
            )?;
        }
        if let Some(ref domain) = params.domain {
            conn.execute(
                "UPDATE websites SET domain = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![domain, id],
            )?;
        }

        let website = conn
            .prepare(&format!("{SELECT_WEBSITE} WHERE id = ?1"))?
            .query_row(duckdb::params![id], row_to_website)?;

        Ok(Some(website))
    }

    /// Delete a website and all of its events.
    ///
    /// There is no FK cascade, so events go first, in the same transaction as
    /// the existence check and the website row.
    pub async fn delete_website(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let exists: i64 = tx
            .prepare("SELECT COUNT(*) FROM websites WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(false);
        }

        let removed = tx.execute("DELETE FROM events WHERE website_id = ?1", duckdb::params![id])?;
        tx.execute("DELETE FROM websites WHERE id = ?1", duckdb::params![id])?;
        tx.commit()?;

        tracing::info!(website_id = id, events = removed, "Website deleted");
        Ok(true)
    }
}
