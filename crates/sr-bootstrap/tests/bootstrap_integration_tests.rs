//! End-to-end bootstrap against a file-backed store and an on-disk seed script.

use sr_bootstrap::{Bootstrapper, SeedOutcome, Step, StepOutcome};
use sr_core::{Config, RequiredTable, SchemaState};
use sr_store::StoreDb;
use std::fs;
use std::path::Path;

const INIT_SQL: &str = "\
-- MySQL dump
/*!40101 SET NAMES utf8 */;
DROP TABLE IF EXISTS `Items`;
CREATE TABLE `Items` (
  `Id` int NOT NULL AUTO_INCREMENT,
  PRIMARY KEY (`Id`)
);
LOCK TABLES `Items` WRITE;
INSERT INTO Items (Id, Name, Description, Img) VALUES
  (1, 'Scalpel', 'No. 10 blade', 'scalpel.png'),
  (2, 'Forceps', 'Adson', 'forceps.png');
UNLOCK TABLES;
INSERT INTO Units (Id, Name, Img, ItemId) VALUES (10, 'Single', 's.png', 1);
INSERT INTO OCRItems (Id, ItemId, OCRKeyword, UnitId) VALUES (1000, 1, 'SCALPEL', 10);
insert into Events (Id, Name, \"Time\", DoctorName, PatientName, LastEditPerson)
  values (1, 'Appendectomy', TIMESTAMP '2025-05-08 09:00:00', 'Dr. Grey', 'J. Doe', 'nurse');
INSERT INTO EventItems (Id, EventId, ItemId, Quantity, UnitId) VALUES (1, 1, 1, 2, 10);
";

fn write_project(root: &Path) -> Config {
    fs::create_dir_all(root.join("Data")).unwrap();
    fs::write(root.join("Data/init.sql"), INIT_SQL).unwrap();
    fs::write(
        root.join("stockroom.yml"),
        "name: theatre_stock\ndatabase:\n  path: inventory.duckdb\n",
    )
    .unwrap();
    Config::load_from_dir(root).unwrap()
}

fn open(config: &Config, root: &Path) -> StoreDb {
    StoreDb::open(&config.database_path_absolute(root)).unwrap()
}

#[test]
fn bootstrap_seeds_file_store_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());
    let roots = vec![dir.path().to_path_buf()];

    {
        let boot = Bootstrapper::from_config(open(&config, dir.path()), &config, &roots);
        let report = boot.ensure_ready();

        assert_eq!(report.schema_after, SchemaState::Present);
        assert_eq!(
            report.seed,
            SeedOutcome::Loaded {
                statements: 5,
                items: 2
            }
        );
        assert!(report.anomalies.is_empty());
        assert!(!report.is_degraded());
    }
    assert!(dir.path().join("inventory.duckdb").exists());

    // Reopen: schema and data survive, and nothing is loaded twice.
    let boot = Bootstrapper::from_config(open(&config, dir.path()), &config, &roots);
    let report = boot.ensure_ready();

    assert_eq!(report.schema_before, SchemaState::Present);
    assert_eq!(report.seed, SeedOutcome::AlreadySeeded);
    assert!(matches!(
        report.outcome(Step::Provision),
        Some(StepOutcome::Skipped(_))
    ));

    let counts = boot.row_counts().unwrap();
    let rows = |table: RequiredTable| {
        counts
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, n)| *n)
            .unwrap()
    };
    assert_eq!(rows(RequiredTable::Items), 2);
    assert_eq!(rows(RequiredTable::Units), 1);
    assert_eq!(rows(RequiredTable::OcrItems), 1);
    assert_eq!(rows(RequiredTable::Events), 1);
    assert_eq!(rows(RequiredTable::EventItems), 1);
    assert_eq!(rows(RequiredTable::BarCodes), 0);
}

#[test]
fn repair_then_bootstrap_on_out_of_band_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());
    let roots = vec![dir.path().to_path_buf()];
    let db = open(&config, dir.path());

    // Schema created outside the migrator, ledger absent.
    sr_store::provision::apply_fallback_ddl(&db);
    let boot = Bootstrapper::from_config(db, &config, &roots);

    let repair = boot.repair().unwrap();
    assert!(repair.ledger_created);
    assert!(repair.entry_inserted);

    let report = boot.ensure_ready();
    assert_eq!(report.schema_before, SchemaState::Present);
    assert!(matches!(report.seed, SeedOutcome::Loaded { items: 2, .. }));
    assert!(!report.has_fatal());
}
