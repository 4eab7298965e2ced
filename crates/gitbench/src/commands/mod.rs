//! Command implementations

pub mod materialize;
pub mod plan;
pub mod resolve;
pub mod version;

use crate::config::ProjectConfig;
use crate::errors::CliError;
use std::path::{Path, PathBuf};

/// A parsed command, independent of clap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Materialize {
        descriptor: PathBuf,
        reference: String,
        snapshot_dir: Option<PathBuf>,
        timeout: Option<u64>,
    },
    Resolve {
        reference: String,
        dir: PathBuf,
    },
    Plan,
    Version,
}

impl Command {
    /// Short name used in spans and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Materialize { .. } => "materialize",
            Self::Resolve { .. } => "resolve",
            Self::Plan => "plan",
            Self::Version => "version",
        }
    }
}

/// Run `command` and return what should be printed on stdout
pub async fn execute(command: Command, config_path: Option<&Path>) -> Result<String, CliError> {
    match command {
        Command::Version => Ok(version::get_version_info()),
        Command::Materialize {
            descriptor,
            reference,
            snapshot_dir,
            timeout,
        } => {
            let config = ProjectConfig::load(config_path)?;
            let mut settings = config.snapshot_config()?;
            if let Some(dir) = snapshot_dir {
                settings.snapshot_root = Some(dir);
            }
            if let Some(seconds) = timeout {
                settings.timeout_seconds = seconds;
            }
            settings.validate()?;
            materialize::execute(&settings, &descriptor, &reference).await
        }
        Command::Resolve { reference, dir } => {
            let config = ProjectConfig::load(config_path)?;
            resolve::execute(&config.snapshot_config()?, &reference, &dir).await
        }
        Command::Plan => {
            let config = ProjectConfig::load(config_path)?;
            plan::execute(&config)
        }
    }
}
