//! Snapshot materialization.
//!
//! Turns a git reference into an isolated clone of the repository checked out
//! at that reference, and points a generated project descriptor at the clone.
//! Steps run strictly in order and each waits for the previous git process:
//!
//! 1. resolve the reference to a commit (from the descriptor's directory)
//! 2. discover and canonicalize the repository root
//! 3. create a fresh snapshot directory outside the repository
//! 4. clone the repository into it and check out the commit
//! 5. replace the repository root with the snapshot path in the descriptor
//!
//! The snapshot directory is never deleted here. It is handed back, on success
//! and on failure alike, so the caller can schedule it for cleanup once the
//! build and run steps are done with it.

use crate::config::SnapshotConfig;
use crate::git::Git;
use crate::rewrite::rewrite_descriptor;
use crate::{Error, Result};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

/// Prefix for snapshot directory names
pub const SNAPSHOT_DIR_PREFIX: &str = "gitbench-snapshot-";

/// A materialized snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Directory holding the clone
    pub directory: PathBuf,
    /// Commit the clone is checked out at
    pub commit: String,
    /// Canonical root of the source repository
    pub repository_root: PathBuf,
    /// Number of root paths replaced in the descriptor
    pub replacements: usize,
}

/// A failed materialization.
///
/// `snapshot_dir` is set when the failure happened after the snapshot
/// directory was created; it must still be cleaned up by the caller.
#[derive(Error, Debug, Diagnostic)]
#[error("Failed to materialize git snapshot")]
pub struct MaterializeFailure {
    /// Partially populated snapshot directory, if one was created
    pub snapshot_dir: Option<PathBuf>,
    /// What went wrong
    #[source]
    #[diagnostic_source]
    pub error: Error,
}

impl MaterializeFailure {
    fn before_snapshot(error: Error) -> Self {
        Self {
            snapshot_dir: None,
            error,
        }
    }

    fn with_snapshot(snapshot_dir: PathBuf, error: Error) -> Self {
        Self {
            snapshot_dir: Some(snapshot_dir),
            error,
        }
    }

    /// Discard the snapshot directory and keep the error
    #[must_use]
    pub fn into_error(self) -> Error {
        self.error
    }
}

/// Creates isolated snapshots of a repository at a git reference
#[derive(Debug, Clone)]
pub struct Materializer {
    git: Git,
    snapshot_root: PathBuf,
}

impl Materializer {
    /// Create a materializer from explicit settings
    #[must_use]
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            git: Git::from_config(config),
            snapshot_root: config.snapshot_root(),
        }
    }

    /// Create a materializer with default settings and `GITBENCH_*` overrides
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&SnapshotConfig::from_env()?))
    }

    /// Git wrapper used by this materializer
    #[must_use]
    pub const fn git(&self) -> &Git {
        &self.git
    }

    /// Directory under which snapshots are created
    #[must_use]
    pub fn snapshot_root(&self) -> &Path {
        &self.snapshot_root
    }

    /// Materialize `reference` for the project described by `descriptor`.
    ///
    /// On success the descriptor has been rewritten in place to reference the
    /// returned snapshot directory.
    #[instrument(name = "materialize", skip(self), fields(descriptor = %descriptor.display()))]
    pub async fn materialize(
        &self,
        descriptor: &Path,
        reference: &str,
    ) -> std::result::Result<Snapshot, MaterializeFailure> {
        let working_dir =
            descriptor_directory(descriptor).map_err(MaterializeFailure::before_snapshot)?;

        let commit = self
            .git
            .resolve_commit(reference, &working_dir)
            .await
            .map_err(MaterializeFailure::before_snapshot)?;

        let reported_root = self
            .git
            .toplevel(&working_dir)
            .await
            .map_err(MaterializeFailure::before_snapshot)?;
        let repository_root =
            canonical_path(&reported_root).map_err(MaterializeFailure::before_snapshot)?;

        let directory = self
            .create_snapshot_dir(&repository_root)
            .map_err(MaterializeFailure::before_snapshot)?;

        match self
            .populate(descriptor, &working_dir, &repository_root, &directory, &commit)
            .await
        {
            Ok(replacements) => {
                info!(
                    reference,
                    commit = %commit,
                    snapshot = %directory.display(),
                    replacements,
                    "Materialized git snapshot"
                );
                Ok(Snapshot {
                    directory,
                    commit,
                    repository_root,
                    replacements,
                })
            }
            Err(error) => Err(MaterializeFailure::with_snapshot(directory, error)),
        }
    }

    async fn populate(
        &self,
        descriptor: &Path,
        working_dir: &Path,
        repository_root: &Path,
        directory: &Path,
        commit: &str,
    ) -> Result<usize> {
        self.git
            .clone_repository(repository_root, directory, working_dir)
            .await?;
        self.git.checkout(commit, directory).await?;
        rewrite_descriptor(descriptor, repository_root, directory).await
    }

    /// Create an empty, uniquely named snapshot directory that is kept on disk.
    fn create_snapshot_dir(&self, repository_root: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.snapshot_root).map_err(|e| {
            Error::io(
                e,
                Some(self.snapshot_root.clone()),
                "create snapshot root directory",
            )
        })?;

        let root = canonical_path(&self.snapshot_root)?;
        if root.starts_with(repository_root) {
            return Err(Error::configuration(format!(
                "snapshot root {} lies inside repository {}",
                root.display(),
                repository_root.display()
            )));
        }

        let dir = tempfile::Builder::new()
            .prefix(SNAPSHOT_DIR_PREFIX)
            .tempdir_in(&root)
            .map_err(|e| Error::io(e, Some(root.clone()), "create snapshot directory"))?;
        Ok(dir.keep())
    }
}

/// Directory git commands run from: the one containing the descriptor.
fn descriptor_directory(descriptor: &Path) -> Result<PathBuf> {
    if !descriptor.is_file() {
        return Err(Error::descriptor(
            descriptor,
            "locate",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        ));
    }

    match descriptor.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Ok(PathBuf::from(".")),
    }
}

/// Absolute path with symlinks and `..` resolved, in the spelling tools
/// print it in (no `\\?\` prefix on Windows).
fn canonical_path(path: &Path) -> Result<PathBuf> {
    let canonical = std::fs::canonicalize(path)
        .map_err(|e| Error::io(e, Some(path.to_path_buf()), "canonicalize path"))?;

    #[cfg(windows)]
    {
        let text = canonical.to_string_lossy();
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return Ok(PathBuf::from(stripped));
        }
    }

    Ok(canonical)
}
