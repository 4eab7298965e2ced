//! Git-aware build pipeline for gitbench
//!
//! A benchmarking host builds each job with a [`Toolchain`]: a [`Generator`]
//! writes the build project, then host-specific builders and executors take
//! over. Wrapping a toolchain in [`GitAwareToolchain`] makes its generated
//! project compile the sources of a git reference instead of the working
//! tree, using [`gitbench_snapshot::Materializer`].
//!
//! The crate also carries the job-side vocabulary: [`GitJob`] as users write
//! it, [`Job`] as the host consumes it, the [`RuntimeMoniker`] tables and the
//! [`GitReferenceColumn`] for summary tables.

pub mod column;
pub mod error;
pub mod generator;
pub mod job;
pub mod pipeline;
pub mod runtime;
pub mod toolchain;

pub use column::{Column, ColumnCategory, GitReferenceColumn, UnitType, sort_columns};
pub use error::{Error, Result};
pub use generator::GitAwareGenerator;
pub use job::{DEFAULT_GIT_REFERENCE, DEFAULT_UNROLL_FACTOR, GitJob, Job, RunSettings};
pub use pipeline::{
    ArtifactsPaths, BenchmarkCase, BuildPartition, GenerateError, GenerateResult, GenerateStatus,
    Generator, Toolchain, ValidationError,
};
pub use runtime::{Runtime, RuntimeFamily, RuntimeMoniker, ToolchainDescriptor, ToolchainKind};
pub use toolchain::{GIT_AWARE_SUFFIX, GitAware, GitAwareToolchain};
