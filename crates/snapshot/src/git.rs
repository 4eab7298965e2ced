//! The four git operations a snapshot needs, each a single external call.

use crate::config::SnapshotConfig;
use crate::process::CommandRunner;
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Thin wrapper over the git command line
#[derive(Debug, Clone)]
pub struct Git {
    runner: CommandRunner,
}

impl Git {
    /// Use an explicit runner (its program is invoked as git)
    #[must_use]
    pub const fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    /// Build from the materializer configuration
    #[must_use]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(CommandRunner::new(
            config.git_program.as_os_str(),
            config.timeout(),
        ))
    }

    /// The underlying runner
    #[must_use]
    pub const fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Resolve `reference` to a full commit id, running git from `working_dir`.
    ///
    /// The reference is peeled to a commit so annotated tags resolve to the
    /// commit they point at. Any non-timeout failure is reported as
    /// [`Error::ReferenceResolution`].
    pub async fn resolve_commit(&self, reference: &str, working_dir: &Path) -> Result<String> {
        let revision = format!("{reference}^{{commit}}");
        let result = self
            .runner
            .run(&["rev-parse", "--verify", revision.as_str()], working_dir)
            .await;

        match result {
            Ok(commit) if !commit.is_empty() => {
                debug!(reference, commit = %commit, "Resolved git reference");
                Ok(commit)
            }
            Ok(_) => Err(Error::reference_resolution(
                reference,
                working_dir,
                Error::ExternalTool {
                    command: format!("git rev-parse --verify {revision}"),
                    working_dir: working_dir.to_path_buf(),
                    exit_code: Some(0),
                    reason: "printed no commit id".to_string(),
                    stdout: String::new(),
                    stderr: String::new(),
                    source: None,
                },
            )),
            Err(e) if e.is_timeout() => Err(e),
            Err(e) => Err(Error::reference_resolution(reference, working_dir, e)),
        }
    }

    /// Top-level directory of the repository containing `working_dir`
    pub async fn toplevel(&self, working_dir: &Path) -> Result<PathBuf> {
        let root = self
            .runner
            .run(&["rev-parse", "--show-toplevel"], working_dir)
            .await?;
        Ok(PathBuf::from(root))
    }

    /// Full clone of `source` into `destination`
    pub async fn clone_repository(
        &self,
        source: &Path,
        destination: &Path,
        working_dir: &Path,
    ) -> Result<()> {
        let args: [OsString; 3] = [
            "clone".into(),
            source.as_os_str().to_owned(),
            destination.as_os_str().to_owned(),
        ];
        self.runner.run(&args, working_dir).await?;
        Ok(())
    }

    /// Check out `commit` inside `repository`
    pub async fn checkout(&self, commit: &str, repository: &Path) -> Result<()> {
        self.runner.run(&["checkout", commit], repository).await?;
        Ok(())
    }
}
