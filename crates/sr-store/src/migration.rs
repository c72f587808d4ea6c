//! Declarative migration runner.
//!
//! Applied migrations are tracked by id in the ledger table. Each pending
//! migration runs together with its ledger row inside one transaction, so a
//! failed migration leaves neither schema changes nor a ledger entry behind.
//! Re-running is a no-op once every migration is recorded.

use crate::connection::with_transaction;
use crate::ddl::{Migration, MIGRATIONS};
use crate::error::{StoreError, StoreResult};
use crate::ledger::{applied_migration_ids, ensure_ledger_table, record_migration};
use duckdb::Connection;
use sr_core::config::PRODUCT_VERSION;

/// The "run declarative migrations" capability used by provisioning.
pub trait Migrator {
    /// Apply every pending migration, returning the ids applied.
    fn migrate(&self, conn: &Connection) -> StoreResult<Vec<String>>;
}

/// Runs the migrations embedded in this crate.
pub struct EmbeddedMigrator {
    migrations: &'static [Migration],
    product_version: String,
}

impl EmbeddedMigrator {
    pub fn new(product_version: impl Into<String>) -> Self {
        Self::with_migrations(MIGRATIONS, product_version)
    }

    /// Use a custom migration list.
    pub fn with_migrations(
        migrations: &'static [Migration],
        product_version: impl Into<String>,
    ) -> Self {
        Self {
            migrations,
            product_version: product_version.into(),
        }
    }
}

impl Default for EmbeddedMigrator {
    fn default() -> Self {
        Self::new(PRODUCT_VERSION)
    }
}

impl Migrator for EmbeddedMigrator {
    fn migrate(&self, conn: &Connection) -> StoreResult<Vec<String>> {
        ensure_ledger_table(conn)
            .map_err(|e| StoreError::MigrationError(format!("ledger unavailable: {e}")))?;
        let applied = applied_migration_ids(conn)
            .map_err(|e| StoreError::MigrationError(format!("failed to read ledger: {e}")))?;

        let mut newly_applied = Vec::new();
        for migration in self.migrations {
            if applied.contains(migration.id) {
                continue;
            }
            log::debug!("Applying migration {}", migration.id);

            with_transaction(conn, |tx| {
                tx.execute_batch(migration.sql).map_err(|e| {
                    StoreError::MigrationError(format!("migration {} failed: {e}", migration.id))
                })?;
                record_migration(tx, migration.id, &self.product_version).map_err(|e| {
                    StoreError::MigrationError(format!(
                        "failed to record migration {}: {e}",
                        migration.id
                    ))
                })
            })?;

            newly_applied.push(migration.id.to_string());
        }
        Ok(newly_applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::list_ledger;
    use crate::StoreDb;

    #[test]
    fn migrate_applies_pending_and_records_ledger() {
        let db = StoreDb::open_memory().unwrap();
        let conn = db.connect().unwrap();

        let applied = EmbeddedMigrator::default().migrate(&conn).unwrap();
        assert_eq!(applied, vec![sr_core::config::BASELINE_MIGRATION_ID]);

        let ledger = list_ledger(&conn).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].product_version, PRODUCT_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let db = StoreDb::open_memory().unwrap();
        let conn = db.connect().unwrap();
        let migrator = EmbeddedMigrator::default();

        migrator.migrate(&conn).unwrap();
        let second = migrator.migrate(&conn).unwrap();
        assert!(second.is_empty());
        assert_eq!(list_ledger(&conn).unwrap().len(), 1);
    }

    #[test]
    fn failed_migration_rolls_back_with_its_ledger_row() {
        static BROKEN: &[Migration] = &[Migration {
            id: "20250101000000_Broken",
            sql: "CREATE TABLE Half (Id INTEGER); CREATE TABLE Half (Id INTEGER);",
        }];
        let db = StoreDb::open_memory().unwrap();
        let conn = db.connect().unwrap();

        let err = EmbeddedMigrator::with_migrations(BROKEN, "1.0")
            .migrate(&conn)
            .unwrap_err();
        assert!(matches!(err, StoreError::MigrationError(_)));
        assert!(list_ledger(&conn).unwrap().is_empty());

        let half: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'Half'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(half, 0);
    }
}
