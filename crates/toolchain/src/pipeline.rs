//! Host build pipeline contracts.
//!
//! A benchmarking host drives each build partition through three stages:
//! a [`Generator`] writes a build project into an artifacts directory, a
//! builder compiles it and an executor runs it. The host owns builders and
//! executors; this crate only needs to pass them through, so they appear here
//! as associated types of [`Toolchain`] without behaviour of their own.

use crate::job::Job;
use async_trait::async_trait;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Locations of the artifacts generated for one build partition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactsPaths {
    /// Root of the artifacts tree for this partition
    pub build_artifacts_directory_path: PathBuf,
    /// Directory the compiled program is written to
    pub binaries_directory_path: PathBuf,
    /// The generated project descriptor
    pub project_file_path: PathBuf,
    /// Name of the generated program
    pub program_name: String,
}

/// One benchmark to run under one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCase {
    /// Display name of the benchmark method
    pub name: String,
    /// Job the benchmark runs under
    pub job: Job,
}

/// Benchmarks that share one generated project and build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPartition {
    /// Program name used for generated files
    pub program_name: String,
    /// Benchmarks built together
    pub cases: Vec<BenchmarkCase>,
}

/// Shared error carried by a failed generation
pub type GenerateError = Arc<dyn StdError + Send + Sync>;

/// Outcome of project generation
#[derive(Debug, Clone)]
pub enum GenerateStatus {
    /// Project generated and ready to build
    Success,
    /// Generation failed
    Failure(GenerateError),
}

/// What a [`Generator`] hands back to the host.
///
/// Failures still carry the artifact paths and the cleanup list: the host
/// removes everything listed in `artifacts_to_cleanup` whether or not the
/// build goes ahead.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Paths of the generated artifacts
    pub artifacts_paths: ArtifactsPaths,
    /// Files and directories the host deletes once the run is over
    pub artifacts_to_cleanup: Vec<PathBuf>,
    /// Success or failure
    pub status: GenerateStatus,
}

impl GenerateResult {
    /// A successful generation
    #[must_use]
    pub const fn success(artifacts_paths: ArtifactsPaths, artifacts_to_cleanup: Vec<PathBuf>) -> Self {
        Self {
            artifacts_paths,
            artifacts_to_cleanup,
            status: GenerateStatus::Success,
        }
    }

    /// A failed generation
    pub fn failure(
        artifacts_paths: ArtifactsPaths,
        artifacts_to_cleanup: Vec<PathBuf>,
        error: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            artifacts_paths,
            artifacts_to_cleanup,
            status: GenerateStatus::Failure(Arc::new(error)),
        }
    }

    /// Whether the project was generated
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, GenerateStatus::Success)
    }

    /// The failure cause, if generation failed
    #[must_use]
    pub fn error(&self) -> Option<&GenerateError> {
        match &self.status {
            GenerateStatus::Success => None,
            GenerateStatus::Failure(error) => Some(error),
        }
    }

    /// Schedule one more path for cleanup
    #[must_use]
    pub fn with_cleanup(mut self, path: PathBuf) -> Self {
        self.artifacts_to_cleanup.push(path);
        self
    }
}

/// Problem found while validating a benchmark against a toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Whether the benchmark cannot run at all
    pub is_critical: bool,
    /// Human readable description
    pub message: String,
    /// Benchmark the problem applies to
    pub benchmark: Option<String>,
}

/// Writes the build project for a partition
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate the project for `partition` under `root_artifacts_dir`
    async fn generate_project(
        &self,
        partition: &BuildPartition,
        root_artifacts_dir: &Path,
    ) -> GenerateResult;
}

/// Bundles the generator, builder and executor for one target
pub trait Toolchain: Send + Sync {
    /// Project generator
    type Generator: Generator;
    /// Host-specific builder
    type Builder: Send + Sync;
    /// Host-specific executor
    type Executor: Send + Sync;

    /// Display name
    fn name(&self) -> String;

    /// The generator
    fn generator(&self) -> &Self::Generator;

    /// The builder
    fn builder(&self) -> &Self::Builder;

    /// The executor
    fn executor(&self) -> &Self::Executor;

    /// Whether benchmarks run inside the host process
    fn is_in_process(&self) -> bool;

    /// Check that `case` can be built and run with this toolchain
    fn validate(&self, case: &BenchmarkCase) -> Vec<ValidationError>;
}
