//! Generator decorator that retargets a generated project at a git snapshot

use crate::pipeline::{BuildPartition, GenerateResult, Generator};
use async_trait::async_trait;
use gitbench_snapshot::Materializer;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::{debug, info, warn};

/// Wraps a [`Generator`] so the project it generates builds the sources of
/// `git_reference` instead of the working tree.
///
/// After the wrapped generator succeeds, the repository is materialized at
/// the reference and the generated descriptor is rewritten to point at the
/// snapshot. The snapshot directory is added to the cleanup list, also when
/// materialization fails part way.
///
/// Equality and hashing consider the wrapped generator and the reference;
/// materializer settings are ignored.
#[derive(Debug, Clone)]
pub struct GitAwareGenerator<G> {
    inner: G,
    git_reference: String,
    materializer: Materializer,
}

impl<G: Generator> GitAwareGenerator<G> {
    /// Wrap `inner` to build `git_reference`
    pub fn new(inner: G, git_reference: impl Into<String>, materializer: Materializer) -> Self {
        Self {
            inner,
            git_reference: git_reference.into(),
            materializer,
        }
    }
}

impl<G> GitAwareGenerator<G> {
    /// The configured git reference
    #[must_use]
    pub fn git_reference(&self) -> &str {
        &self.git_reference
    }

    /// The wrapped generator
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// The materializer used for snapshots
    pub const fn materializer(&self) -> &Materializer {
        &self.materializer
    }
}

#[async_trait]
impl<G: Generator> Generator for GitAwareGenerator<G> {
    async fn generate_project(
        &self,
        partition: &BuildPartition,
        root_artifacts_dir: &Path,
    ) -> GenerateResult {
        let result = self
            .inner
            .generate_project(partition, root_artifacts_dir)
            .await;

        if !result.is_success() {
            debug!(
                program = %partition.program_name,
                "Wrapped generator failed, skipping git snapshot"
            );
            return result;
        }

        let descriptor = result.artifacts_paths.project_file_path.clone();
        match self
            .materializer
            .materialize(&descriptor, &self.git_reference)
            .await
        {
            Ok(snapshot) => {
                info!(
                    program = %partition.program_name,
                    reference = %self.git_reference,
                    commit = %snapshot.commit,
                    "Project retargeted at git snapshot"
                );
                result.with_cleanup(snapshot.directory)
            }
            Err(failure) => {
                warn!(
                    program = %partition.program_name,
                    reference = %self.git_reference,
                    error = %failure.error,
                    "Git snapshot failed"
                );
                let GenerateResult {
                    artifacts_paths,
                    mut artifacts_to_cleanup,
                    ..
                } = result;
                if let Some(dir) = failure.snapshot_dir {
                    artifacts_to_cleanup.push(dir);
                }
                GenerateResult::failure(artifacts_paths, artifacts_to_cleanup, failure.error)
            }
        }
    }
}

impl<G: PartialEq> PartialEq for GitAwareGenerator<G> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.git_reference == other.git_reference
    }
}

impl<G: Eq> Eq for GitAwareGenerator<G> {}

impl<G: Hash> Hash for GitAwareGenerator<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
        self.git_reference.hash(state);
    }
}
