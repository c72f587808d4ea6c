//! Inventory store for Stockroom.
//!
//! A DuckDB-backed store holding items, units, barcodes, events, OCR
//! keywords and access credentials, plus the pieces that bring it to a
//! usable state: schema probing, declarative-then-fallback provisioning,
//! transactional seed loading, and migration ledger repair.

pub mod connection;
pub mod ddl;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod migration;
pub mod probe;
pub mod provision;
pub mod seed_loader;

pub use connection::StoreDb;
pub use error::{StoreError, StoreResult};
pub use ledger::{repair_ledger, MigrationLedgerEntry, RepairReport, LEDGER_TABLE};
pub use migration::{EmbeddedMigrator, Migrator};
pub use probe::{presence_of, tables_empty, try_presence_of};
pub use provision::{ensure_present, FallbackFailure, FallbackReport, ProvisionReport};
pub use seed_loader::{load_seed, SeedLoadSummary};
