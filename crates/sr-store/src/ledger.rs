//! Migration ledger: the bookkeeping table of applied migrations.
//!
//! One row per applied migration, keyed by `MigrationId`. Rows are only ever
//! added; [`repair_ledger`] reconciles a missing or incomplete ledger with a
//! schema that was created out-of-band.

use crate::connection::{query_count, StoreDb};
use crate::error::{StoreError, StoreResult};
use duckdb::Connection;
use std::collections::HashSet;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "__MigrationsHistory";

const CREATE_LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS \"__MigrationsHistory\" (
    MigrationId    VARCHAR(150) NOT NULL PRIMARY KEY,
    ProductVersion VARCHAR(32) NOT NULL
)";

/// A ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationLedgerEntry {
    pub migration_id: String,
    pub product_version: String,
}

/// Outcome of [`repair_ledger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairReport {
    /// The ledger table did not exist and was created.
    pub ledger_created: bool,
    /// The baseline entry was missing and was inserted.
    pub entry_inserted: bool,
}

/// Check the catalog for the ledger table.
pub fn ledger_exists(conn: &Connection) -> StoreResult<bool> {
    let count = query_count(
        conn,
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_catalog = current_database() \
           AND table_schema = current_schema() \
           AND lower(table_name) = lower('__MigrationsHistory')",
    )
    .map_err(|e| StoreError::LedgerError(format!("ledger lookup failed: {e}")))?;
    Ok(count > 0)
}

/// Create the ledger table if it does not exist.
pub(crate) fn ensure_ledger_table(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(CREATE_LEDGER_SQL)
        .map_err(|e| StoreError::LedgerError(format!("failed to create {LEDGER_TABLE}: {e}")))
}

/// Return every ledger row ordered by migration id.
pub fn list_ledger(conn: &Connection) -> StoreResult<Vec<MigrationLedgerEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT MigrationId, ProductVersion FROM \"__MigrationsHistory\" ORDER BY MigrationId",
        )
        .map_err(|e| StoreError::LedgerError(format!("prepare failed: {e}")))?;

    let entries = stmt
        .query_map([], |row| {
            Ok(MigrationLedgerEntry {
                migration_id: row.get(0)?,
                product_version: row.get(1)?,
            })
        })
        .map_err(|e| StoreError::LedgerError(format!("query failed: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::LedgerError(format!("row error: {e}")))?;
    Ok(entries)
}

/// Ids of all recorded migrations.
pub(crate) fn applied_migration_ids(conn: &Connection) -> StoreResult<HashSet<String>> {
    Ok(list_ledger(conn)?
        .into_iter()
        .map(|entry| entry.migration_id)
        .collect())
}

fn entry_exists(conn: &Connection, migration_id: &str) -> StoreResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM \"__MigrationsHistory\" WHERE MigrationId = ?",
            duckdb::params![migration_id],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::LedgerError(format!("entry lookup failed: {e}")))?;
    Ok(count > 0)
}

/// Record `migration_id`, leaving an existing row untouched.
pub(crate) fn record_migration(
    conn: &Connection,
    migration_id: &str,
    product_version: &str,
) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO \"__MigrationsHistory\" (MigrationId, ProductVersion) VALUES (?, ?)",
        duckdb::params![migration_id, product_version],
    )
    .map_err(|e| StoreError::LedgerError(format!("failed to record {migration_id}: {e}")))?;
    Ok(())
}

/// Reconcile the ledger with a schema created outside the migrator.
///
/// Creates the ledger table when it is absent, then records
/// `migration_id` unless it is already present. Safe to call repeatedly.
/// Every failure is returned; there is no fallback.
pub fn repair_ledger(
    db: &StoreDb,
    migration_id: &str,
    product_version: &str,
) -> StoreResult<RepairReport> {
    let conn = db.connect()?;
    let mut report = RepairReport::default();

    log::info!("Checking for {LEDGER_TABLE} in {}", db.location());
    if ledger_exists(&conn)? {
        log::info!("{LEDGER_TABLE} present");
    } else {
        log::info!("{LEDGER_TABLE} missing, creating it");
        ensure_ledger_table(&conn)?;
        report.ledger_created = true;
        log::info!("Created missing {LEDGER_TABLE} table");
    }

    log::info!("Recording migration {migration_id} ({product_version})");
    if entry_exists(&conn, migration_id)? {
        log::info!("Migration {migration_id} already recorded");
    } else {
        record_migration(&conn, migration_id, product_version)?;
        report.entry_inserted = true;
        log::info!("Recorded migration {migration_id}");
    }

    Ok(report)
}
