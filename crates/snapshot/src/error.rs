//! Error types for the gitbench-snapshot crate

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for snapshot materialization
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The git reference could not be resolved to a commit
    #[error("Could not resolve git reference '{reference}' in {}", working_dir.display())]
    #[diagnostic(
        code(gitbench::snapshot::reference),
        help("Check that the reference exists (`git branch -a`, `git tag`) and that the project lives inside a git repository")
    )]
    ReferenceResolution {
        /// The reference as supplied by the caller
        reference: String,
        /// Directory git was run from
        working_dir: PathBuf,
        /// The failed git invocation
        #[source]
        source: Box<Error>,
    },

    /// An external command exited non-zero or could not be started
    #[error("Command `{command}` {reason} in {}{}", working_dir.display(), format_streams(stdout, stderr))]
    #[diagnostic(code(gitbench::snapshot::external_tool))]
    ExternalTool {
        /// Full command line
        command: String,
        /// Directory the command was run from
        working_dir: PathBuf,
        /// Exit code, if the process ran to completion
        exit_code: Option<i32>,
        /// Short description of what went wrong
        reason: String,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
        /// Spawn or wait failure, if any
        #[source]
        source: Option<std::io::Error>,
    },

    /// An external command exceeded its wall-clock budget and was killed
    #[error("Command `{command}` timed out after {seconds} seconds in {}", working_dir.display())]
    #[diagnostic(
        code(gitbench::snapshot::timeout),
        help("Raise GITBENCH_GIT_TIMEOUT if cloning this repository legitimately takes longer")
    )]
    ExternalToolTimeout {
        /// Full command line
        command: String,
        /// Directory the command was run from
        working_dir: PathBuf,
        /// The budget that elapsed
        seconds: u64,
        /// Output captured before the process was killed
        stdout: String,
        /// Error output captured before the process was killed
        stderr: String,
    },

    /// The project descriptor could not be read or written
    #[error("Failed to {operation} project descriptor {}", path.display())]
    #[diagnostic(
        code(gitbench::snapshot::descriptor),
        help("Check that the generated project file exists and is writable")
    )]
    DescriptorRewrite {
        /// Descriptor path
        path: PathBuf,
        /// What was being attempted (read, write, locate)
        operation: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(gitbench::snapshot::io))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(gitbench::snapshot::config))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },
}

impl Error {
    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(|p| p.into_boxed_path()),
            operation: operation.into(),
        }
    }

    /// Create a descriptor read/write error
    pub fn descriptor(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::DescriptorRewrite {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create an error for a command that could not be started or awaited
    pub fn spawn(
        command: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::ExternalTool {
            command: command.into(),
            working_dir: working_dir.into(),
            exit_code: None,
            reason: format!("could not be run ({source})"),
            stdout: String::new(),
            stderr: String::new(),
            source: Some(source),
        }
    }

    /// Wrap a failed resolution command
    pub fn reference_resolution(
        reference: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        source: Self,
    ) -> Self {
        Self::ReferenceResolution {
            reference: reference.into(),
            working_dir: working_dir.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is a timeout of an external command
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ExternalToolTimeout { .. })
    }
}

/// Render captured output for the error message, skipping empty streams.
fn format_streams(stdout: &str, stderr: &str) -> String {
    let mut rendered = String::new();
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    if !stdout.is_empty() {
        rendered.push_str("\nstdout: ");
        rendered.push_str(stdout);
    }
    if !stderr.is_empty() {
        rendered.push_str("\nstderr: ");
        rendered.push_str(stderr);
    }
    rendered
}

/// Result type for gitbench-snapshot operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_message_includes_streams() {
        let error = Error::ExternalTool {
            command: "git checkout deadbeef".to_string(),
            working_dir: PathBuf::from("/tmp/snap"),
            exit_code: Some(1),
            reason: "exited with status 1".to_string(),
            stdout: String::new(),
            stderr: "error: pathspec 'deadbeef' did not match\n".to_string(),
            source: None,
        };

        let message = error.to_string();
        assert!(message.starts_with("Command `git checkout deadbeef` exited with status 1 in /tmp/snap"));
        assert!(message.contains("stderr: error: pathspec 'deadbeef' did not match"));
        assert!(!message.contains("stdout:"));
    }

    #[test]
    fn test_spawn_error_has_no_exit_code() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = Error::spawn("git-missing status", "/work", io);

        match &error {
            Error::ExternalTool {
                exit_code, source, ..
            } => {
                assert!(exit_code.is_none());
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().contains("could not be run"));
    }

    #[test]
    fn test_reference_resolution_keeps_source() {
        let inner = Error::ExternalTool {
            command: "git rev-parse nope".to_string(),
            working_dir: PathBuf::from("/repo"),
            exit_code: Some(128),
            reason: "exited with status 128".to_string(),
            stdout: String::new(),
            stderr: "fatal: Needed a single revision".to_string(),
            source: None,
        };
        let error = Error::reference_resolution("nope", "/repo", inner);

        assert_eq!(
            error.to_string(),
            "Could not resolve git reference 'nope' in /repo"
        );
        let source = std::error::Error::source(&error).map(ToString::to_string);
        assert!(source.is_some_and(|s| s.contains("Needed a single revision")));
    }

    #[test]
    fn test_timeout_display() {
        let error = Error::ExternalToolTimeout {
            command: "git clone /a /b".to_string(),
            working_dir: PathBuf::from("/a"),
            seconds: 300,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Command `git clone /a /b` timed out after 300 seconds in /a"
        );
    }
}
