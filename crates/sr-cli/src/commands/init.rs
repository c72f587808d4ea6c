//! Init command implementation

use anyhow::{Context, Result};
use sr_bootstrap::{BootstrapReport, SeedOutcome, StepOutcome};

use crate::cli::{GlobalArgs, InitArgs};
use crate::commands::common::{CommandContext, ExitCode};

/// Execute the init command
pub(crate) fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let boot = ctx.bootstrapper()?;

    let report = boot.ensure_ready();

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_report(&ctx.config.name, boot.store().location(), &report, global.verbose);
    }

    if report.has_fatal() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

fn print_report(name: &str, location: &str, report: &BootstrapReport, verbose: bool) {
    println!("Bootstrapping {name} ({location})");
    println!();
    for step in &report.steps {
        let detail = match &step.outcome {
            StepOutcome::Success => String::new(),
            StepOutcome::Skipped(reason) => format!(" ({reason})"),
            StepOutcome::Recoverable(err) | StepOutcome::Fatal(err) => format!(": {err}"),
        };
        println!("  {:<12} {}{}", step.step.to_string(), step.outcome.status(), detail);
    }
    println!();

    println!(
        "Schema: {} -> {}",
        report.schema_before, report.schema_after
    );
    if !report.applied_migrations.is_empty() {
        println!("Migrations applied: {}", report.applied_migrations.join(", "));
    }
    if report.used_fallback {
        println!("Schema created with direct DDL");
    }

    match report.seed {
        SeedOutcome::Loaded { statements, items } => {
            println!("Seed: loaded {statements} statement(s), {items} item(s)")
        }
        SeedOutcome::AlreadySeeded => println!("Seed: store already holds data"),
        SeedOutcome::Disabled => println!("Seed: disabled"),
        SeedOutcome::NotAttempted => println!("Seed: not attempted"),
        SeedOutcome::Failed => println!("Seed: failed, store left unseeded"),
    }
    if !report.anomalies.is_empty() {
        println!("Seed script irregularities: {}", report.anomalies.len());
        if verbose {
            for anomaly in &report.anomalies {
                println!("  {anomaly:?}");
            }
        }
    }

    let status = if report.has_fatal() {
        "FAILED"
    } else if report.is_degraded() {
        "ready (degraded)"
    } else {
        "ready"
    };
    println!(
        "\nStore {status} in {}ms",
        report.elapsed().num_milliseconds()
    );
}
