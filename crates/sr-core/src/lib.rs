//! sr-core - Core library for Stockroom
//!
//! This crate provides the configuration loader, the required-table set
//! shared by the schema prober and the seed guard, and the tolerant seed
//! script parser. Nothing here touches the database.

pub mod config;
pub mod error;
pub mod schema;
pub mod seed_script;

pub use config::{Config, DatabaseConfig, LedgerConfig, SeedConfig};
pub use error::{CoreError, CoreResult};
pub use schema::{RequiredTable, SchemaState};
pub use seed_script::{
    parse_seed_script, FlushCause, ParseAnomaly, ParsedScript, SeedScriptParser, SeedStatement,
};
