//! Referential delete actions for the inventory tables.
//!
//! DuckDB enforces the foreign keys but only with restrict semantics, so the
//! cascade and set-null actions of the schema are applied here: restrict
//! checks run first, then child rows are removed deepest first, each
//! statement in auto-commit mode.

use crate::error::{StoreError, StoreResult};
use duckdb::Connection;

/// Rows touched by a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteSummary {
    pub items: usize,
    pub units: usize,
    pub barcodes: usize,
    pub ocr_items: usize,
    /// OCRItems rows whose `UnitId` was set to NULL.
    pub ocr_units_cleared: usize,
    pub events: usize,
    pub event_items: usize,
}

fn exec<P: duckdb::Params>(
    conn: &Connection,
    what: &str,
    sql: &str,
    params: P,
) -> StoreResult<usize> {
    conn.execute(sql, params)
        .map_err(|e| StoreError::QueryError(format!("{what} failed: {e}")))
}

fn count<P: duckdb::Params>(conn: &Connection, sql: &str, params: P) -> StoreResult<i64> {
    conn.query_row(sql, params, |row| row.get::<_, i64>(0))
        .map_err(|e| StoreError::QueryError(format!("reference count failed: {e}")))
}

/// Delete an item with its units, barcodes and OCR keywords.
///
/// Refused with [`StoreError::DeleteRestricted`] while any EventItems row
/// references the item or one of its units. OCR keywords of other items that
/// point at one of the deleted units keep their row with `UnitId` cleared.
pub fn delete_item(conn: &Connection, item_id: i64) -> StoreResult<DeleteSummary> {
    let references = count(
        conn,
        "SELECT COUNT(*) FROM EventItems \
         WHERE ItemId = ? OR UnitId IN (SELECT Id FROM Units WHERE ItemId = ?)",
        duckdb::params![item_id, item_id],
    )?;
    if references > 0 {
        return Err(StoreError::DeleteRestricted {
            table: "Items",
            id: item_id,
            references,
        });
    }

    let mut summary = DeleteSummary::default();
    summary.barcodes = exec(
        conn,
        "delete BarCodes",
        "DELETE FROM BarCodes WHERE UnitId IN (SELECT Id FROM Units WHERE ItemId = ?)",
        duckdb::params![item_id],
    )?;
    let dangling = count(
        conn,
        "SELECT COUNT(*) FROM OCRItems \
         WHERE ItemId <> ? AND UnitId IN (SELECT Id FROM Units WHERE ItemId = ?)",
        duckdb::params![item_id, item_id],
    )?;
    if dangling > 0 {
        summary.ocr_units_cleared = exec(
            conn,
            "clear OCRItems.UnitId",
            "UPDATE OCRItems SET UnitId = NULL \
             WHERE ItemId <> ? AND UnitId IN (SELECT Id FROM Units WHERE ItemId = ?)",
            duckdb::params![item_id, item_id],
        )?;
    }
    summary.ocr_items = exec(
        conn,
        "delete OCRItems",
        "DELETE FROM OCRItems WHERE ItemId = ?",
        duckdb::params![item_id],
    )?;
    summary.units = exec(
        conn,
        "delete Units",
        "DELETE FROM Units WHERE ItemId = ?",
        duckdb::params![item_id],
    )?;
    summary.items = exec(
        conn,
        "delete Items",
        "DELETE FROM Items WHERE Id = ?",
        duckdb::params![item_id],
    )?;

    log::debug!("Deleted item {item_id}: {summary:?}");
    Ok(summary)
}

/// Delete a unit with its barcodes, clearing OCR keyword references to it.
///
/// Refused while any EventItems row references the unit.
pub fn delete_unit(conn: &Connection, unit_id: i64) -> StoreResult<DeleteSummary> {
    let references = count(
        conn,
        "SELECT COUNT(*) FROM EventItems WHERE UnitId = ?",
        duckdb::params![unit_id],
    )?;
    if references > 0 {
        return Err(StoreError::DeleteRestricted {
            table: "Units",
            id: unit_id,
            references,
        });
    }

    let mut summary = DeleteSummary::default();
    summary.barcodes = exec(
        conn,
        "delete BarCodes",
        "DELETE FROM BarCodes WHERE UnitId = ?",
        duckdb::params![unit_id],
    )?;
    let dangling = count(
        conn,
        "SELECT COUNT(*) FROM OCRItems WHERE UnitId = ?",
        duckdb::params![unit_id],
    )?;
    if dangling > 0 {
        summary.ocr_units_cleared = exec(
            conn,
            "clear OCRItems.UnitId",
            "UPDATE OCRItems SET UnitId = NULL WHERE UnitId = ?",
            duckdb::params![unit_id],
        )?;
    }
    summary.units = exec(
        conn,
        "delete Units",
        "DELETE FROM Units WHERE Id = ?",
        duckdb::params![unit_id],
    )?;
    Ok(summary)
}

/// Delete an event and its EventItems rows.
pub fn delete_event(conn: &Connection, event_id: i64) -> StoreResult<DeleteSummary> {
    let mut summary = DeleteSummary::default();
    summary.event_items = exec(
        conn,
        "delete EventItems",
        "DELETE FROM EventItems WHERE EventId = ?",
        duckdb::params![event_id],
    )?;
    summary.events = exec(
        conn,
        "delete Events",
        "DELETE FROM Events WHERE Id = ?",
        duckdb::params![event_id],
    )?;
    Ok(summary)
}

#[cfg(test)]
#[path = "inventory_test.rs"]
mod tests;
