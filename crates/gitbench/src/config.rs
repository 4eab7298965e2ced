//! `gitbench.toml` project configuration
//!
//! ```toml
//! [snapshot]
//! timeout-seconds = 900
//!
//! [[job]]
//! git-reference = "main"
//! baseline = true
//!
//! [[job]]
//! git-reference = "HEAD"
//! ```
//!
//! Settings are layered: built-in defaults, then the `[snapshot]` table, then
//! `GITBENCH_*` environment variables, then command line flags.

use crate::errors::CliError;
use gitbench_snapshot::SnapshotConfig;
use gitbench_toolchain::GitJob;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the current directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "gitbench.toml";

/// Parsed project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Materializer settings
    pub snapshot: SnapshotConfig,
    /// Configured jobs
    #[serde(rename = "job")]
    pub jobs: Vec<GitJob>,
    /// File the configuration came from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ProjectConfig {
    /// Parse configuration text read from `path`
    pub fn parse(path: &Path, text: &str) -> Result<Self, CliError> {
        let mut config: Self = toml::from_str(text)
            .map_err(|e| CliError::config_parse(path, text.to_string(), &e))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `gitbench.toml` in the
    /// current directory is used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(CliError::ConfigMissing {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| CliError::FileError {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&path, &text)?;
        debug!(
            path = %path.display(),
            jobs = config.jobs.len(),
            "Loaded project configuration"
        );
        Ok(config)
    }

    /// Snapshot settings with environment overrides applied
    pub fn snapshot_config(&self) -> Result<SnapshotConfig, CliError> {
        Ok(self.snapshot.clone().with_env_overrides()?)
    }

    /// Name used for the configuration in messages
    pub fn display_source(&self) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
