//! Isolated git snapshots for benchmarking older revisions
//!
//! This crate materializes a project's source tree at an arbitrary git
//! reference without touching the original checkout:
//!
//! - [`Git`] wraps the four git commands involved (`rev-parse <ref>`,
//!   `rev-parse --show-toplevel`, `clone`, `checkout`)
//! - [`CommandRunner`] is the single place external processes are started,
//!   with captured output and a hard timeout that kills the process group
//! - [`Materializer`] strings them together and rewrites the generated
//!   project descriptor to point at the snapshot
//!
//! # Example
//!
//! ```no_run
//! use gitbench_snapshot::{Materializer, SnapshotConfig};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let materializer = Materializer::new(&SnapshotConfig::default());
//! let snapshot = materializer
//!     .materialize(Path::new("bin/Release/Bench.csproj"), "main")
//!     .await?;
//! println!("main is {} at {}", snapshot.commit, snapshot.directory.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod materializer;
pub mod process;
pub mod rewrite;

pub use config::{DEFAULT_TIMEOUT_SECONDS, SnapshotConfig};
pub use error::{Error, Result};
pub use git::Git;
pub use materializer::{MaterializeFailure, Materializer, Snapshot};
pub use process::{CommandOutput, CommandRunner};
pub use rewrite::{rewrite_descriptor, substitute_root, substitute_root_bytes};
