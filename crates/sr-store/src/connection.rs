//! Inventory store handle.
//!
//! [`StoreDb`] owns the root DuckDB [`Connection`] and hands out short-lived
//! scoped connections onto the same database. Each probe, provisioning pass,
//! seed load and ledger repair opens its own connection and drops it when
//! done; nothing is held open across steps.

use crate::error::{StoreError, StoreResult};
use duckdb::Connection;
use std::path::Path;

/// Handle to the inventory database.
///
/// Opening does not touch the schema; provisioning is the bootstrap
/// pipeline's job.
pub struct StoreDb {
    root: Connection,
    location: String,
}

impl StoreDb {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let root = Connection::open(path)
            .map_err(|e| StoreError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            root,
            location: path.display().to_string(),
        })
    }

    /// Create an empty in-memory database.
    pub fn open_memory() -> StoreResult<Self> {
        let root =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(Self {
            root,
            location: ":memory:".to_string(),
        })
    }

    /// Open `path`, treating `:memory:` as an in-memory database.
    pub fn open_location(path: &str) -> StoreResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Where the database lives, for log lines.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Open a fresh scoped connection onto the same database.
    pub fn connect(&self) -> StoreResult<Connection> {
        self.root
            .try_clone()
            .map_err(|e| StoreError::ConnectionError(format!("scoped connection: {e}")))
    }

    /// Run `body` on a fresh connection inside `BEGIN` / `COMMIT`, rolling
    /// back on error.
    pub fn transaction<F, T>(&self, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.connect()?;
        with_transaction(&conn, body)
    }
}

/// Execute `body` within a transaction on an existing connection.
pub(crate) fn with_transaction<F, T>(conn: &Connection, body: F) -> StoreResult<T>
where
    F: FnOnce(&Connection) -> StoreResult<T>,
{
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| StoreError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StoreError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}

/// Query a single `COUNT(*)`-style integer.
pub(crate) fn query_count(conn: &Connection, sql: &str) -> StoreResult<i64> {
    conn.query_row(sql, [], |row| row.get::<_, i64>(0))
        .map_err(|e| StoreError::QueryError(format!("{e}: {sql}")))
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
