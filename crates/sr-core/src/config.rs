//! Configuration types and parsing for stockroom.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum length of a ledger `MigrationId` value.
pub const MIGRATION_ID_MAX_LEN: usize = 150;

/// Maximum length of a ledger `ProductVersion` value.
pub const PRODUCT_VERSION_MAX_LEN: usize = 32;

/// Main configuration from stockroom.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Deployment name, used in log lines only
    #[serde(default = "default_name")]
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Baseline data loading
    #[serde(default)]
    pub seed: SeedConfig,

    /// Migration ledger repair settings
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Seed script configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Load the seed script when the store is empty
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seed script location.
    ///
    /// Absolute paths are used as-is; relative paths are searched for under
    /// the executable directory first, then the project directory.
    #[serde(default = "default_seed_script")]
    pub script: String,
}

/// Migration ledger configuration used by `repair`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Migration id recorded by the repair utility
    #[serde(default = "default_baseline_migration")]
    pub baseline_migration: String,

    /// Product version recorded alongside the baseline migration
    #[serde(default = "default_product_version")]
    pub product_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            database: DatabaseConfig::default(),
            seed: SeedConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script: default_seed_script(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            baseline_migration: default_baseline_migration(),
            product_version: default_product_version(),
        }
    }
}

const DEFAULT_DB_PATH: &str = "stockroom.duckdb";

const DEFAULT_SEED_SCRIPT: &str = "Data/init.sql";

/// Id of the initial declarative migration.
pub const BASELINE_MIGRATION_ID: &str = "20250508095936_InitialCreate";

/// Product version stamped on ledger rows.
pub const PRODUCT_VERSION: &str = "8.0.5";

fn default_name() -> String {
    "stockroom".to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_seed_script() -> String {
    DEFAULT_SEED_SCRIPT.to_string()
}

fn default_baseline_migration() -> String {
    BASELINE_MIGRATION_ID.to_string()
}

fn default_product_version() -> String {
    PRODUCT_VERSION.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for stockroom.yml or stockroom.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("stockroom.yml");
        let yaml_path = dir.join("stockroom.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "name cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.seed.enabled && self.seed.script.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "seed.script cannot be empty while seeding is enabled".to_string(),
            });
        }

        let migration = &self.ledger.baseline_migration;
        if migration.is_empty() || migration.len() > MIGRATION_ID_MAX_LEN {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger.baseline_migration must be 1-{MIGRATION_ID_MAX_LEN} characters, got {}",
                    migration.len()
                ),
            });
        }

        let version = &self.ledger.product_version;
        if version.is_empty() || version.len() > PRODUCT_VERSION_MAX_LEN {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger.product_version must be 1-{PRODUCT_VERSION_MAX_LEN} characters, got {}",
                    version.len()
                ),
            });
        }

        Ok(())
    }

    /// Returns `true` when the database lives in memory only.
    pub fn is_in_memory(&self) -> bool {
        self.database.path == ":memory:"
    }

    /// Resolve the database path against a project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn database_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.database.path);
        if self.is_in_memory() || path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
