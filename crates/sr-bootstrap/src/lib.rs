//! sr-bootstrap - Startup pipeline for Stockroom
//!
//! Brings an inventory store to a usable state at process start: probe the
//! schema, provision it through migrations or direct DDL, and load the seed
//! script into an empty store. Also hosts the manual migration ledger repair.

pub mod bootstrapper;
pub mod error;
pub mod report;
pub mod seed_source;

pub use bootstrapper::Bootstrapper;
pub use error::{BootstrapError, BootstrapResult, ErrorKind};
pub use report::{BootstrapReport, SeedOutcome, Step, StepOutcome, StepReport};
pub use seed_source::SeedSource;
