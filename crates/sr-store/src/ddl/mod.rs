//! Embedded DDL for the inventory store.
//!
//! [`MIGRATIONS`] holds the declarative migrations, each a `.sql` file
//! embedded via `include_str!` and keyed by the id recorded in the ledger.
//! [`fallback::FALLBACK_STATEMENTS`] is the direct `IF NOT EXISTS` DDL used
//! when the migrations cannot be applied.

pub mod fallback;

use sr_core::config::BASELINE_MIGRATION_ID;

/// A single declarative migration.
pub struct Migration {
    /// Ledger key, `<timestamp>_<Name>`.
    pub id: &'static str,
    /// Raw SQL to execute.
    pub sql: &'static str,
}

/// All known migrations, in order.
pub static MIGRATIONS: &[Migration] = &[Migration {
    id: BASELINE_MIGRATION_ID,
    sql: include_str!("v001_initial_create.sql"),
}];

pub use fallback::{FallbackStatement, FALLBACK_STATEMENTS};
