//! Schema presence and emptiness checks.
//!
//! State is computed fresh on every call, on a connection scoped to the call.

use crate::connection::{query_count, StoreDb};
use crate::error::{StoreError, StoreResult};
use duckdb::Connection;
use sr_core::{RequiredTable, SchemaState};

/// Count how many of `tables` exist in the active schema.
pub fn count_present_tables(conn: &Connection, tables: &[RequiredTable]) -> StoreResult<usize> {
    if tables.is_empty() {
        return Ok(0);
    }
    let names = tables
        .iter()
        .map(|t| format!("'{}'", t.name().to_ascii_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT COUNT(DISTINCT lower(table_name)) FROM information_schema.tables \
         WHERE table_catalog = current_database() \
           AND table_schema = current_schema() \
           AND table_type = 'BASE TABLE' \
           AND lower(table_name) IN ({names})"
    );
    let count = query_count(conn, &sql)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Probe for `tables`, surfacing catalog failures.
pub fn try_presence_of(db: &StoreDb, tables: &[RequiredTable]) -> StoreResult<SchemaState> {
    let conn = db.connect()?;
    let present = count_present_tables(&conn, tables)?;
    log::debug!("Schema probe: {present}/{} required tables present", tables.len());
    if present == tables.len() {
        Ok(SchemaState::Present)
    } else {
        Ok(SchemaState::Missing)
    }
}

/// Probe for `tables`, treating any catalog failure as [`SchemaState::Missing`].
pub fn presence_of(db: &StoreDb, tables: &[RequiredTable]) -> SchemaState {
    state_or_missing(try_presence_of(db, tables))
}

fn state_or_missing(result: StoreResult<SchemaState>) -> SchemaState {
    match result {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Schema probe failed, assuming schema is missing: {e}");
            SchemaState::Missing
        }
    }
}

/// Number of rows in `table`.
pub fn table_row_count(conn: &Connection, table: RequiredTable) -> StoreResult<i64> {
    query_count(conn, &format!("SELECT COUNT(*) FROM \"{}\"", table.name()))
}

/// True when none of `tables` holds a row.
///
/// Fails if any of the tables is missing.
pub fn tables_empty(db: &StoreDb, tables: &[RequiredTable]) -> StoreResult<bool> {
    let conn = db.connect()?;
    for table in tables {
        let has_rows = query_count(
            &conn,
            &format!(
                "SELECT COUNT(*) FROM (SELECT 1 FROM \"{}\" LIMIT 1)",
                table.name()
            ),
        )
        .map_err(|e| StoreError::QueryError(format!("emptiness check on {table}: {e}")))?;
        if has_rows > 0 {
            log::debug!("{table} already holds data");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Row counts for `tables`, in the given order.
pub fn row_counts(db: &StoreDb, tables: &[RequiredTable]) -> StoreResult<Vec<(RequiredTable, i64)>> {
    let conn = db.connect()?;
    let mut counts = Vec::with_capacity(tables.len());
    for &table in tables {
        counts.push((table, table_row_count(&conn, table)?));
    }
    Ok(counts)
}
