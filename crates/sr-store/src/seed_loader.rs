//! All-or-nothing loading of parsed seed statements.

use crate::connection::StoreDb;
use crate::error::{StoreError, StoreResult};
use sr_core::SeedStatement;

/// What a successful load did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedLoadSummary {
    pub executed: usize,
    /// Whitespace-only statements that were not sent to the store.
    pub skipped_blank: usize,
}

/// Execute `statements` in order inside one transaction.
///
/// The first failing statement rolls back the whole batch and its error is
/// returned; on success every statement is committed together.
pub fn load_seed(db: &StoreDb, statements: &[SeedStatement]) -> StoreResult<SeedLoadSummary> {
    let summary = db.transaction(|conn| {
        let mut summary = SeedLoadSummary::default();
        for stmt in statements {
            if stmt.is_blank() {
                summary.skipped_blank += 1;
                continue;
            }
            conn.execute_batch(&stmt.text)
                .map_err(|e| StoreError::SeedLoadError {
                    start_line: stmt.start_line,
                    message: e.to_string(),
                })?;
            summary.executed += 1;
        }
        Ok(summary)
    })?;

    log::info!(
        "Seed data loaded: {} statement(s) committed into {}",
        summary.executed,
        db.location()
    );
    Ok(summary)
}
