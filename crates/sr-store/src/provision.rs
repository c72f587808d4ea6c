//! Schema provisioning: declarative migrations first, direct DDL second.
//!
//! The fallback statements run one by one in auto-commit mode. A failing
//! statement is logged and skipped, so the fallback can leave the schema
//! partially created; callers re-probe afterwards. Nothing here drops data.

use crate::connection::StoreDb;
use crate::ddl::FALLBACK_STATEMENTS;
use crate::error::StoreError;
use crate::migration::Migrator;

/// A fallback statement that did not apply.
#[derive(Debug)]
pub struct FallbackFailure {
    /// Object the statement was meant to create.
    pub statement: &'static str,
    pub error: StoreError,
}

/// Outcome of the direct DDL pass.
#[derive(Debug, Default)]
pub struct FallbackReport {
    /// Statements that executed successfully, in order.
    pub applied: Vec<&'static str>,
    pub failed: Vec<FallbackFailure>,
}

impl FallbackReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of [`ensure_present`].
#[derive(Debug, Default)]
pub struct ProvisionReport {
    /// Migrations applied by the migrator.
    pub applied_migrations: Vec<String>,
    /// Why the migrator failed, when it did.
    pub migration_error: Option<StoreError>,
    /// Set when the fallback DDL ran.
    pub fallback: Option<FallbackReport>,
}

impl ProvisionReport {
    /// True when the declarative path succeeded.
    pub fn used_migrations(&self) -> bool {
        self.migration_error.is_none()
    }
}

/// Bring the schema up to date, leaving it unchanged or more complete.
///
/// Never fails; every problem is recorded in the returned report.
pub fn ensure_present<M: Migrator + ?Sized>(db: &StoreDb, migrator: &M) -> ProvisionReport {
    let migration = db.connect().and_then(|conn| migrator.migrate(&conn));

    match migration {
        Ok(applied) => {
            if applied.is_empty() {
                log::info!("Migrations up to date");
            } else {
                log::info!("Applied {} migration(s): {}", applied.len(), applied.join(", "));
            }
            ProvisionReport {
                applied_migrations: applied,
                ..ProvisionReport::default()
            }
        }
        Err(e) => {
            log::warn!("Migration failed, falling back to direct schema creation: {e}");
            let fallback = apply_fallback_ddl(db);
            ProvisionReport {
                applied_migrations: Vec::new(),
                migration_error: Some(e),
                fallback: Some(fallback),
            }
        }
    }
}

/// Run every fallback statement independently.
pub fn apply_fallback_ddl(db: &StoreDb) -> FallbackReport {
    let mut report = FallbackReport::default();

    let conn = match db.connect() {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Fallback DDL: no connection: {e}");
            let message = e.to_string();
            report.failed = FALLBACK_STATEMENTS
                .iter()
                .map(|stmt| FallbackFailure {
                    statement: stmt.name,
                    error: StoreError::ConnectionError(message.clone()),
                })
                .collect();
            return report;
        }
    };

    for stmt in FALLBACK_STATEMENTS {
        match conn.execute_batch(stmt.sql) {
            Ok(()) => {
                log::debug!("Fallback DDL: ensured {}", stmt.name);
                report.applied.push(stmt.name);
            }
            Err(e) => {
                log::warn!("Fallback DDL: {} failed, skipping: {e}", stmt.name);
                report.failed.push(FallbackFailure {
                    statement: stmt.name,
                    error: StoreError::QueryError(format!("{}: {e}", stmt.name)),
                });
            }
        }
    }

    log::info!(
        "Fallback DDL finished: {} applied, {} failed",
        report.applied.len(),
        report.failed.len()
    );
    report
}
