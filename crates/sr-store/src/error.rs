//! Error types for the inventory store.

use thiserror::Error;

/// Inventory store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database or a scoped connection (S001).
    #[error("[S001] Store connection failed: {0}")]
    ConnectionError(String),

    /// Declarative migration failed (S002).
    #[error("[S002] Store migration failed: {0}")]
    MigrationError(String),

    /// SQL execution error (S003).
    #[error("[S003] Store query failed: {0}")]
    QueryError(String),

    /// Transaction management error (S004).
    #[error("[S004] Store transaction failed: {0}")]
    TransactionError(String),

    /// A seed statement failed; the whole batch was rolled back (S005).
    #[error("[S005] Seed statement starting at line {start_line} failed: {message}")]
    SeedLoadError { start_line: usize, message: String },

    /// Migration ledger inspection or repair failed (S006).
    #[error("[S006] Migration ledger error: {0}")]
    LedgerError(String),

    /// Delete refused because restricting rows still reference the target (S007).
    #[error("[S007] Cannot delete {table} {id}: still referenced by {references} EventItems row(s)")]
    DeleteRestricted {
        table: &'static str,
        id: i64,
        references: i64,
    },

    /// DuckDB driver error with preserved source chain (S008).
    #[error("[S008] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}
