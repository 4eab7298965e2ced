//! Materializer configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default wall-clock budget for a single git invocation (5 minutes)
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Environment variable overriding the git executable
pub const GIT_PROGRAM_ENV: &str = "GITBENCH_GIT";
/// Environment variable overriding the per-command timeout, in seconds
pub const GIT_TIMEOUT_ENV: &str = "GITBENCH_GIT_TIMEOUT";
/// Environment variable overriding where snapshot directories are created
pub const SNAPSHOT_DIR_ENV: &str = "GITBENCH_SNAPSHOT_DIR";

/// Settings for snapshot materialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SnapshotConfig {
    /// Git executable, resolved through `PATH` when not absolute
    pub git_program: PathBuf,
    /// Timeout applied to every git invocation
    pub timeout_seconds: u64,
    /// Parent directory for snapshots (system temp dir when unset)
    pub snapshot_root: Option<PathBuf>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            git_program: PathBuf::from("git"),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            snapshot_root: None,
        }
    }
}

impl SnapshotConfig {
    /// Build the default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `GITBENCH_*` environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(program) = std::env::var_os(GIT_PROGRAM_ENV).filter(|v| !v.is_empty()) {
            self.git_program = PathBuf::from(program);
        }

        if let Ok(raw) = std::env::var(GIT_TIMEOUT_ENV) {
            let seconds = raw.trim().parse::<u64>().map_err(|e| {
                Error::configuration(format!("{GIT_TIMEOUT_ENV}='{raw}' is not a number of seconds: {e}"))
            })?;
            self.timeout_seconds = seconds;
        }

        if let Some(dir) = std::env::var_os(SNAPSHOT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.snapshot_root = Some(PathBuf::from(dir));
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings that can never work
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::configuration("git timeout must be at least one second"));
        }
        if self.git_program.as_os_str().is_empty() {
            return Err(Error::configuration("git program must not be empty"));
        }
        Ok(())
    }

    /// Timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Directory under which snapshot directories are created
    #[must_use]
    pub fn snapshot_root(&self) -> PathBuf {
        self.snapshot_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
