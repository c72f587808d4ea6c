//! Where the seed script comes from.

use crate::error::{BootstrapError, BootstrapResult};
use sr_core::SeedConfig;
use std::path::{Path, PathBuf};

/// Seed script input for the bootstrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// A script file read at seed time.
    Path(PathBuf),
    /// Script text held in memory; `label` names it in log lines.
    Text { label: String, text: String },
    /// Seeding is turned off.
    Disabled,
}

impl SeedSource {
    /// Resolve `relative` against `roots`, returning the first existing file.
    ///
    /// Absolute paths are used as-is. When no root holds the file the
    /// candidate under the first root is returned, so the read at seed time
    /// reports where the script was expected.
    pub fn discover(relative: impl AsRef<Path>, roots: &[PathBuf]) -> Self {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            return SeedSource::Path(relative.to_path_buf());
        }

        for root in roots {
            let candidate = root.join(relative);
            if candidate.is_file() {
                log::debug!("Seed script found at {}", candidate.display());
                return SeedSource::Path(candidate);
            }
        }

        let fallback = roots
            .first()
            .map(|root| root.join(relative))
            .unwrap_or_else(|| relative.to_path_buf());
        log::debug!(
            "Seed script {} not found under {} root(s)",
            relative.display(),
            roots.len()
        );
        SeedSource::Path(fallback)
    }

    /// Build the source described by the `seed` config section.
    pub fn from_config(config: &SeedConfig, roots: &[PathBuf]) -> Self {
        if config.enabled {
            Self::discover(&config.script, roots)
        } else {
            SeedSource::Disabled
        }
    }

    /// The executable's directory followed by `project_dir`.
    pub fn default_roots(project_dir: &Path) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            roots.push(dir);
        }
        if !roots.iter().any(|root| root == project_dir) {
            roots.push(project_dir.to_path_buf());
        }
        roots
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, SeedSource::Disabled)
    }

    /// Human-readable origin of the script.
    pub fn describe(&self) -> String {
        match self {
            SeedSource::Path(path) => path.display().to_string(),
            SeedSource::Text { label, .. } => label.clone(),
            SeedSource::Disabled => "<disabled>".to_string(),
        }
    }

    /// Read the whole script.
    pub fn read(&self) -> BootstrapResult<String> {
        match self {
            SeedSource::Path(path) => {
                std::fs::read_to_string(path).map_err(|e| BootstrapError::SeedScriptUnavailable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            SeedSource::Text { text, .. } => Ok(text.clone()),
            SeedSource::Disabled => Err(BootstrapError::SeedScriptUnavailable {
                path: self.describe(),
                reason: "seeding is disabled".to_string(),
            }),
        }
    }
}
