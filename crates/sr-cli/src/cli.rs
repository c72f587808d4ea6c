//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Stockroom - bootstrap and maintain the inventory store
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (`:memory:` for an in-memory store)
    #[arg(short, long, global = true, env = "STOCKROOM_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the schema and seed an empty store
    Init(InitArgs),

    /// Create the migration ledger and record the baseline migration
    Repair(RepairArgs),

    /// Show schema presence, row counts, and ledger entries
    Status(StatusArgs),

    /// Parse the seed script without touching the store
    Parse(ParseArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Print the bootstrap report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the repair command
#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Migration id to record (defaults to ledger.baseline_migration)
    #[arg(short, long)]
    pub migration: Option<String>,

    /// Product version to record (defaults to ledger.product_version)
    #[arg(long)]
    pub product_version: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print status as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Seed script to parse (defaults to seed.script)
    #[arg(short, long)]
    pub script: Option<String>,

    /// Print every statement in full
    #[arg(long)]
    pub full: bool,

    /// Print the parse result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
