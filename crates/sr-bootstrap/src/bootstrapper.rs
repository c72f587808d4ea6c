//! Startup orchestration for the inventory store.
//!
//! [`Bootstrapper::ensure_ready`] runs probe, provision, re-probe, seed guard
//! and seed in that order and never returns an error: every failure is
//! recorded in the [`BootstrapReport`] and the run carries on, leaving the
//! store schema-ready but possibly unseeded. [`Bootstrapper::repair`] is the
//! manual recovery action and propagates every failure.

use crate::error::{BootstrapError, BootstrapResult};
use crate::report::{BootstrapReport, SeedOutcome, Step, StepOutcome};
use crate::seed_source::SeedSource;
use sr_core::config::{BASELINE_MIGRATION_ID, PRODUCT_VERSION};
use sr_core::{Config, RequiredTable, SchemaState, SeedScriptParser};
use sr_store::probe::{row_counts, table_row_count};
use sr_store::{
    ensure_present, load_seed, repair_ledger, tables_empty, try_presence_of, EmbeddedMigrator,
    Migrator, RepairReport, StoreDb, StoreResult,
};

/// Brings one store to a usable state.
pub struct Bootstrapper<M: Migrator = EmbeddedMigrator> {
    store: StoreDb,
    migrator: M,
    seed_source: SeedSource,
    baseline_migration: String,
    product_version: String,
}

impl<M: Migrator> Bootstrapper<M> {
    pub fn new(store: StoreDb, migrator: M, seed_source: SeedSource) -> Self {
        Self {
            store,
            migrator,
            seed_source,
            baseline_migration: BASELINE_MIGRATION_ID.to_string(),
            product_version: PRODUCT_VERSION.to_string(),
        }
    }

    /// Set the ledger entry written by [`Self::repair`].
    pub fn with_ledger_baseline(
        mut self,
        migration_id: impl Into<String>,
        product_version: impl Into<String>,
    ) -> Self {
        self.baseline_migration = migration_id.into();
        self.product_version = product_version.into();
        self
    }

    pub fn store(&self) -> &StoreDb {
        &self.store
    }

    pub fn seed_source(&self) -> &SeedSource {
        &self.seed_source
    }

    /// Probe, provision if needed, and seed an empty store.
    pub fn ensure_ready(&self) -> BootstrapReport {
        log::info!("Bootstrapping inventory store at {}", self.store.location());
        let mut report = BootstrapReport::start();

        self.probe(&mut report);
        self.provision(&mut report);
        let seed_store = self.seed_guard(&mut report);
        self.seed(&mut report, seed_store);

        let report = report.finish();
        if report.is_degraded() {
            log::warn!(
                "Inventory store ready with problems (schema {}, seed {:?})",
                report.schema_after,
                report.seed
            );
        } else {
            log::info!(
                "Inventory store ready (schema {}, seed {:?})",
                report.schema_after,
                report.seed
            );
        }
        report
    }

    fn probe(&self, report: &mut BootstrapReport) {
        record_probe(report, try_presence_of(&self.store, &RequiredTable::ALL));
    }

    fn provision(&self, report: &mut BootstrapReport) {
        if report.schema_before.is_present() {
            report.record(
                Step::Provision,
                StepOutcome::Skipped("schema already present".to_string()),
            );
            report.record(
                Step::Reprobe,
                StepOutcome::Skipped("nothing provisioned".to_string()),
            );
            return;
        }

        log::info!("Required tables missing, provisioning schema");
        let provision = ensure_present(&self.store, &self.migrator);
        report.applied_migrations = provision.applied_migrations;
        report.used_fallback = provision.fallback.is_some();

        let outcome = match (provision.migration_error, provision.fallback) {
            (None, _) => StepOutcome::Success,
            (Some(e), Some(fallback)) if fallback.is_complete() => {
                StepOutcome::Recoverable(BootstrapError::ProvisionFailure {
                    message: format!("migrations failed, schema created directly: {e}"),
                })
            }
            (Some(e), fallback) => {
                let failed = fallback
                    .map(|f| {
                        f.failed
                            .iter()
                            .map(|failure| failure.statement)
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                StepOutcome::Recoverable(BootstrapError::ProvisionFailure {
                    message: format!("migrations failed ({e}); fallback DDL failed for: {failed}"),
                })
            }
        };
        report.record(Step::Provision, outcome);

        report.schema_after = sr_store::presence_of(&self.store, &RequiredTable::ALL);
        if report.schema_after.is_present() {
            report.record(Step::Reprobe, StepOutcome::Success);
        } else {
            report.record(
                Step::Reprobe,
                StepOutcome::Fatal(BootstrapError::ProvisionFailure {
                    message: "required tables still missing after provisioning".to_string(),
                }),
            );
        }
    }

    /// Returns true when the seed script should be loaded.
    fn seed_guard(&self, report: &mut BootstrapReport) -> bool {
        if !self.seed_source.is_enabled() {
            report.seed = SeedOutcome::Disabled;
            report.record(
                Step::SeedGuard,
                StepOutcome::Skipped("seeding disabled".to_string()),
            );
            return false;
        }

        match tables_empty(&self.store, &RequiredTable::ALL) {
            Ok(true) => {
                report.record(Step::SeedGuard, StepOutcome::Success);
                true
            }
            Ok(false) => {
                log::info!("Inventory store already holds data, skipping seed");
                report.seed = SeedOutcome::AlreadySeeded;
                report.record(Step::SeedGuard, StepOutcome::Success);
                false
            }
            Err(e) => {
                report.seed = SeedOutcome::NotAttempted;
                report.record(
                    Step::SeedGuard,
                    StepOutcome::Recoverable(BootstrapError::GuardCheck(e)),
                );
                false
            }
        }
    }

    fn seed(&self, report: &mut BootstrapReport, seed_store: bool) {
        if !seed_store {
            let reason = match report.seed {
                SeedOutcome::Disabled => "seeding disabled",
                SeedOutcome::AlreadySeeded => "store already holds data",
                _ => "seed guard failed",
            };
            report.record(Step::Seed, StepOutcome::Skipped(reason.to_string()));
            return;
        }

        match self.load_seed_script(report) {
            Ok(outcome) => {
                report.seed = outcome;
                report.record(Step::Seed, StepOutcome::Success);
            }
            Err(e) => {
                log::error!("Seeding failed, continuing without seed data: {e}");
                report.seed = SeedOutcome::Failed;
                report.record(Step::Seed, StepOutcome::Recoverable(e));
            }
        }
    }

    fn load_seed_script(&self, report: &mut BootstrapReport) -> BootstrapResult<SeedOutcome> {
        log::info!("Seeding from {}", self.seed_source.describe());
        let script = self.seed_source.read()?;

        let parsed = SeedScriptParser::parse(&script);
        if !parsed.anomalies.is_empty() {
            log::warn!(
                "Seed script has {} irregular statement(s)",
                parsed.anomalies.len()
            );
        }
        report.anomalies = parsed.anomalies;

        let summary = load_seed(&self.store, &parsed.statements)
            .map_err(BootstrapError::SeedTransactionFailure)?;

        // A count failure after a committed load does not undo the seed.
        let items = match self.store.connect() {
            Ok(conn) => table_row_count(&conn, RequiredTable::Items).unwrap_or(0),
            Err(_) => 0,
        };
        if items > 0 {
            log::info!("Database initialized from seed script.");
        }
        Ok(SeedOutcome::Loaded {
            statements: summary.executed,
            items,
        })
    }

    /// Create the ledger if needed and record the baseline migration.
    pub fn repair(&self) -> BootstrapResult<RepairReport> {
        log::info!(
            "Repairing migration ledger with {} ({})",
            self.baseline_migration,
            self.product_version
        );
        match repair_ledger(&self.store, &self.baseline_migration, &self.product_version) {
            Ok(report) => {
                log::info!("Migration ledger repaired: {report:?}");
                Ok(report)
            }
            Err(e) => {
                log::error!("Migration ledger repair failed: {e}");
                Err(BootstrapError::LedgerRepairFailure(e))
            }
        }
    }

    /// Row count per required table.
    pub fn row_counts(&self) -> BootstrapResult<Vec<(RequiredTable, i64)>> {
        row_counts(&self.store, &RequiredTable::ALL).map_err(BootstrapError::ProbeFailure)
    }
}

impl Bootstrapper<EmbeddedMigrator> {
    /// Wire a bootstrapper from configuration, discovering the seed script
    /// under `roots`.
    pub fn from_config(store: StoreDb, config: &Config, roots: &[std::path::PathBuf]) -> Self {
        let migrator = EmbeddedMigrator::new(config.ledger.product_version.clone());
        Self::new(store, migrator, SeedSource::from_config(&config.seed, roots))
            .with_ledger_baseline(
                config.ledger.baseline_migration.clone(),
                config.ledger.product_version.clone(),
            )
    }
}

/// A failed catalog query counts as a missing schema so provisioning runs.
fn record_probe(report: &mut BootstrapReport, result: StoreResult<SchemaState>) {
    match result {
        Ok(state) => {
            report.schema_before = state;
            report.record(Step::Probe, StepOutcome::Success);
        }
        Err(e) => {
            report.schema_before = SchemaState::Missing;
            report.record(
                Step::Probe,
                StepOutcome::Recoverable(BootstrapError::ProbeFailure(e)),
            );
        }
    }
    report.schema_after = report.schema_before;
}

#[cfg(test)]
#[path = "bootstrapper_test.rs"]
mod tests;
