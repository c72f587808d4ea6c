//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sr_bootstrap::{Bootstrapper, SeedSource};
use sr_core::{Config, CoreError};
use sr_store::StoreDb;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the store is closed cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing to show the user.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Configuration and project root resolved from the global arguments.
pub(crate) struct CommandContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl CommandContext {
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = load_config(global, &root)?;
        Ok(Self { root, config })
    }

    /// Resolved database location.
    pub(crate) fn database_path(&self) -> PathBuf {
        self.config.database_path_absolute(&self.root)
    }

    /// Directories searched for a relative seed script.
    pub(crate) fn seed_roots(&self) -> Vec<PathBuf> {
        SeedSource::default_roots(&self.root)
    }

    /// Open (or create) the configured store.
    pub(crate) fn open_store(&self) -> Result<StoreDb> {
        if self.config.is_in_memory() {
            return StoreDb::open_memory().context("Failed to open in-memory store");
        }
        let path = self.database_path();
        StoreDb::open(&path)
            .with_context(|| format!("Failed to open store at {}", path.display()))
    }

    pub(crate) fn bootstrapper(&self) -> Result<Bootstrapper> {
        let store = self.open_store()?;
        Ok(Bootstrapper::from_config(
            store,
            &self.config,
            &self.seed_roots(),
        ))
    }
}

/// Load the config file, falling back to defaults when the project has none.
///
/// `--database` overrides `database.path`; the result is validated again
/// after the override.
pub(crate) fn load_config(global: &GlobalArgs, root: &Path) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => match Config::load_from_dir(root) {
            Ok(config) => config,
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {path}, using defaults");
                Config::default()
            }
            Err(e) => return Err(e).context("Failed to load project config"),
        },
    };

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
