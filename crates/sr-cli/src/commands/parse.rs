//! Parse command implementation

use anyhow::{Context, Result};
use sr_bootstrap::SeedSource;
use sr_core::{FlushCause, ParseAnomaly, SeedScriptParser};
use std::path::PathBuf;

use crate::cli::{GlobalArgs, ParseArgs};
use crate::commands::common::CommandContext;

/// Execute the parse command
pub(crate) fn execute(args: &ParseArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    let source = match &args.script {
        Some(script) => SeedSource::Path(PathBuf::from(script)),
        None => SeedSource::discover(&ctx.config.seed.script, &ctx.seed_roots()),
    };
    let script = source
        .read()
        .with_context(|| format!("Failed to read seed script {}", source.describe()))?;

    let parsed = SeedScriptParser::parse(&script);

    if args.json {
        let json = serde_json::to_string_pretty(&parsed).context("Failed to serialize statements")?;
        println!("{json}");
        return Ok(());
    }

    println!("Seed script: {}", source.describe());
    println!();
    for stmt in &parsed.statements {
        if args.full {
            println!("-- line {}", stmt.start_line);
            println!("{}", stmt.text);
        } else {
            let first = stmt.text.lines().next().unwrap_or_default();
            let more = stmt.text.lines().count().saturating_sub(1);
            if more > 0 {
                println!("  {:>5}  {first} (+{more} line(s))", stmt.start_line);
            } else {
                println!("  {:>5}  {first}", stmt.start_line);
            }
        }
    }

    if !parsed.anomalies.is_empty() {
        println!();
        println!("Irregularities:");
        for anomaly in &parsed.anomalies {
            println!("  {}", describe_anomaly(anomaly));
        }
    }

    println!();
    println!(
        "{} statement(s), {} irregularit{}",
        parsed.statements.len(),
        parsed.anomalies.len(),
        if parsed.anomalies.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}

fn describe_anomaly(anomaly: &ParseAnomaly) -> String {
    match anomaly {
        ParseAnomaly::DiscardedUnterminated {
            start_line,
            interrupted_at,
        } => format!(
            "line {start_line}: unterminated INSERT dropped, new INSERT at line {interrupted_at}"
        ),
        ParseAnomaly::FlushedUnterminated {
            start_line,
            cause: FlushCause::AdministrativeLine { line },
        } => format!("line {start_line}: unterminated INSERT cut off at line {line}"),
        ParseAnomaly::FlushedUnterminated {
            start_line,
            cause: FlushCause::EndOfInput,
        } => format!("line {start_line}: unterminated INSERT at end of script"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomalies_name_their_lines() {
        let text = describe_anomaly(&ParseAnomaly::DiscardedUnterminated {
            start_line: 4,
            interrupted_at: 9,
        });
        assert!(text.contains("line 4"));
        assert!(text.contains("line 9"));

        let text = describe_anomaly(&ParseAnomaly::FlushedUnterminated {
            start_line: 12,
            cause: FlushCause::EndOfInput,
        });
        assert_eq!(text, "line 12: unterminated INSERT at end of script");
    }
}
