//! CLI error types with miette diagnostics

use gitbench_snapshot::MaterializeFailure;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by gitbench commands
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Configuration file {} does not exist", path.display())]
    #[diagnostic(
        code(gitbench::cli::config_missing),
        help("Create gitbench.toml or pass --config with an existing file")
    )]
    ConfigMissing { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    #[diagnostic(
        code(gitbench::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(gitbench::cli::config_parse_error))]
    ConfigParse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("No [[job]] entries in {}", path.display())]
    #[diagnostic(
        code(gitbench::cli::no_jobs),
        help("Add a [[job]] table with at least a git-reference")
    )]
    NoJobs { path: PathBuf },

    #[error("Failed to materialize git snapshot")]
    #[diagnostic(code(gitbench::cli::materialize))]
    Materialize {
        #[source]
        #[diagnostic_source]
        error: gitbench_snapshot::Error,
        #[help]
        partial: Option<String>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] gitbench_snapshot::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toolchain(#[from] gitbench_toolchain::Error),
}

impl CliError {
    /// Wrap a TOML parse error so miette can point at the offending text
    pub fn config_parse(path: &std::path::Path, src: String, error: &toml::de::Error) -> Self {
        Self::ConfigParse {
            message: error.message().to_string(),
            span: error.span().map(SourceSpan::from),
            src: NamedSource::new(path.display().to_string(), src),
        }
    }
}

impl From<MaterializeFailure> for CliError {
    fn from(failure: MaterializeFailure) -> Self {
        let partial = failure.snapshot_dir.as_ref().map(|dir| {
            format!(
                "A partial snapshot was left at {}; delete it when done",
                dir.display()
            )
        });
        Self::Materialize {
            error: failure.error,
            partial,
        }
    }
}
