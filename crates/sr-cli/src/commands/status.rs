//! Status command implementation

use anyhow::{Context, Result};
use sr_core::RequiredTable;
use sr_store::ledger::{ledger_exists, list_ledger};
use sr_store::probe::row_counts;
use sr_store::{try_presence_of, StoreDb};
use std::collections::BTreeMap;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::CommandContext;

/// Store state as reported by `stockroom status`.
#[derive(Debug, serde::Serialize)]
struct StoreStatus {
    database: String,
    exists: bool,
    /// `present` or `missing`; absent when there is no store.
    schema: Option<String>,
    /// Row count per required table, only when the schema is present.
    tables: Option<BTreeMap<String, i64>>,
    /// Ledger rows, or `None` when the ledger table does not exist.
    ledger: Option<Vec<LedgerRow>>,
}

#[derive(Debug, serde::Serialize)]
struct LedgerRow {
    migration_id: String,
    product_version: String,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    let path = ctx.database_path();
    let status = if !ctx.config.is_in_memory() && !path.exists() {
        StoreStatus {
            database: path.display().to_string(),
            exists: false,
            schema: None,
            tables: None,
            ledger: None,
        }
    } else {
        collect(&ctx.open_store()?)?
    };

    if args.json {
        print_json(&status)
    } else {
        print_status(&status);
        Ok(())
    }
}

fn collect(db: &StoreDb) -> Result<StoreStatus> {
    let schema = try_presence_of(db, &RequiredTable::ALL).context("Schema probe failed")?;

    let tables = if schema.is_present() {
        let counts = row_counts(db, &RequiredTable::ALL).context("Failed to count rows")?;
        Some(
            counts
                .into_iter()
                .map(|(table, rows)| (table.name().to_string(), rows))
                .collect(),
        )
    } else {
        None
    };

    let conn = db.connect().context("Failed to open store connection")?;
    let ledger = if ledger_exists(&conn).context("Failed to inspect migration ledger")? {
        let entries = list_ledger(&conn).context("Failed to read migration ledger")?;
        Some(
            entries
                .into_iter()
                .map(|e| LedgerRow {
                    migration_id: e.migration_id,
                    product_version: e.product_version,
                })
                .collect(),
        )
    } else {
        None
    };

    Ok(StoreStatus {
        database: db.location().to_string(),
        exists: true,
        schema: Some(schema.to_string()),
        tables,
        ledger,
    })
}

fn print_json(status: &StoreStatus) -> Result<()> {
    let json = serde_json::to_string_pretty(status).context("Failed to serialize status")?;
    println!("{json}");
    Ok(())
}

fn print_status(status: &StoreStatus) {
    if !status.exists {
        println!("No store at {}; run `stockroom init`", status.database);
        return;
    }

    println!("Store: {}", status.database);
    println!("Schema: {}", status.schema.as_deref().unwrap_or("unknown"));
    if let Some(tables) = &status.tables {
        println!();
        for table in RequiredTable::ALL {
            if let Some(rows) = tables.get(table.name()) {
                println!("  {:<12} {rows:>8}", table.name());
            }
        }
    }
    println!();
    match &status.ledger {
        Some(entries) if entries.is_empty() => println!("Migration ledger: empty"),
        Some(entries) => {
            println!("Migration ledger:");
            for entry in entries {
                println!("  {} ({})", entry.migration_id, entry.product_version);
            }
        }
        None => println!("Migration ledger: missing (run `stockroom repair`)"),
    }
}
