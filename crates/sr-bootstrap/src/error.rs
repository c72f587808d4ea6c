//! Error types for the bootstrap pipeline.

use serde::Serialize;
use sr_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Failure category, each with its own recovery policy.
///
/// Parse anomalies are not errors; they travel in the report alongside the
/// extracted statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Catalog query failed; the schema is treated as missing.
    ProbeFailure,
    /// Migrations or fallback DDL failed; provisioning continues or degrades.
    ProvisionFailure,
    /// Seeding failed; rolled back, logged and swallowed.
    SeedTransactionFailure,
    /// Ledger repair failed; fatal to the caller of repair.
    LedgerRepairFailure,
}

impl ErrorKind {
    /// Whether the pipeline stops on this kind of failure.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::LedgerRepairFailure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ProbeFailure => "probe failure",
            ErrorKind::ProvisionFailure => "provision failure",
            ErrorKind::SeedTransactionFailure => "seed transaction failure",
            ErrorKind::LedgerRepairFailure => "ledger repair failure",
        };
        f.write_str(name)
    }
}

/// Bootstrap pipeline errors.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// B001: Catalog query failed
    #[error("[B001] Schema probe failed: {0}")]
    ProbeFailure(#[source] StoreError),

    /// B002: Schema could not be fully provisioned
    #[error("[B002] Schema provisioning failed: {message}")]
    ProvisionFailure { message: String },

    /// B003: Seed script could not be read
    #[error("[B003] Seed script unavailable at {path}: {reason}")]
    SeedScriptUnavailable { path: String, reason: String },

    /// B004: Seed batch failed and was rolled back
    #[error("[B004] Seed load failed: {0}")]
    SeedTransactionFailure(#[source] StoreError),

    /// B005: Could not tell whether the store already holds data
    #[error("[B005] Seed guard check failed: {0}")]
    GuardCheck(#[source] StoreError),

    /// B006: Migration ledger repair failed
    #[error("[B006] Migration ledger repair failed: {0}")]
    LedgerRepairFailure(#[source] StoreError),
}

impl BootstrapError {
    /// The failure category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BootstrapError::ProbeFailure(_) | BootstrapError::GuardCheck(_) => {
                ErrorKind::ProbeFailure
            }
            BootstrapError::ProvisionFailure { .. } => ErrorKind::ProvisionFailure,
            BootstrapError::SeedScriptUnavailable { .. }
            | BootstrapError::SeedTransactionFailure(_) => ErrorKind::SeedTransactionFailure,
            BootstrapError::LedgerRepairFailure(_) => ErrorKind::LedgerRepairFailure,
        }
    }
}

/// Result type alias for BootstrapError
pub type BootstrapResult<T> = Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ledger_repair_is_fatal() {
        let err = BootstrapError::LedgerRepairFailure(StoreError::LedgerError("x".into()));
        assert!(err.kind().is_fatal());

        let err = BootstrapError::SeedTransactionFailure(StoreError::SeedLoadError {
            start_line: 4,
            message: "constraint".into(),
        });
        assert_eq!(err.kind(), ErrorKind::SeedTransactionFailure);
        assert!(!err.kind().is_fatal());

        let err = BootstrapError::SeedScriptUnavailable {
            path: "Data/init.sql".into(),
            reason: "not found".into(),
        };
        assert!(!err.kind().is_fatal());
    }

    #[test]
    fn messages_carry_codes() {
        let err = BootstrapError::ProvisionFailure {
            message: "Units still missing".into(),
        };
        assert!(err.to_string().starts_with("[B002]"));

        let err = BootstrapError::SeedTransactionFailure(StoreError::SeedLoadError {
            start_line: 12,
            message: "duplicate key".into(),
        });
        let text = err.to_string();
        assert!(text.starts_with("[B004]"));
        assert!(text.contains("line 12"));
    }
}
