//! Repair command implementation

use anyhow::{Context, Result};
use sr_core::Config;

use crate::cli::{GlobalArgs, RepairArgs};
use crate::commands::common::CommandContext;

/// Execute the repair command
pub(crate) fn execute(args: &RepairArgs, global: &GlobalArgs) -> Result<()> {
    let mut ctx = CommandContext::load(global)?;
    apply_ledger_overrides(&mut ctx.config, args)?;

    let boot = ctx.bootstrapper()?;
    println!("Repairing migration ledger in {}", boot.store().location());

    let report = boot
        .repair()
        .context("Migration ledger repair failed")?;

    let ledger = &ctx.config.ledger;
    if report.ledger_created {
        println!("  Created migration ledger table");
    } else {
        println!("  Migration ledger table present");
    }
    if report.entry_inserted {
        println!(
            "  Recorded {} ({})",
            ledger.baseline_migration, ledger.product_version
        );
    } else {
        println!("  {} already recorded", ledger.baseline_migration);
    }
    Ok(())
}

/// Replace the configured ledger entry with the command-line values; the
/// result is validated again before anything touches the store.
fn apply_ledger_overrides(config: &mut Config, args: &RepairArgs) -> Result<()> {
    if let Some(migration) = &args.migration {
        config.ledger.baseline_migration = migration.clone();
    }
    if let Some(version) = &args.product_version {
        config.ledger.product_version = version.clone();
    }
    config.validate().context("Invalid ledger override")?;
    Ok(())
}
