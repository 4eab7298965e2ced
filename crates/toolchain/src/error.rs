//! Error types for the gitbench-toolchain crate

use crate::runtime::RuntimeMoniker;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while describing jobs and toolchains
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    /// A moniker has no entry in one of the lookup tables
    #[error("Runtime moniker '{moniker}' has no {table} mapping")]
    #[diagnostic(
        code(gitbench::toolchain::unsupported_runtime),
        help("Pick a versioned moniker such as net8.0, mono8.0 or nativeaot8.0")
    )]
    UnsupportedRuntime {
        /// The moniker that was looked up
        moniker: RuntimeMoniker,
        /// Which table rejected it (runtime or toolchain)
        table: &'static str,
    },

    /// A string did not name any known moniker
    #[error("Unknown runtime moniker '{value}'")]
    #[diagnostic(
        code(gitbench::toolchain::unknown_moniker),
        help("Known monikers: {known}")
    )]
    UnknownMoniker {
        /// The rejected input
        value: String,
        /// Comma separated list of accepted spellings
        known: String,
    },
}

impl Error {
    /// Create an unsupported-runtime error
    #[must_use]
    pub const fn unsupported(moniker: RuntimeMoniker, table: &'static str) -> Self {
        Self::UnsupportedRuntime { moniker, table }
    }

    /// Create an unknown-moniker error listing every accepted spelling
    pub fn unknown_moniker(value: impl Into<String>) -> Self {
        let known = RuntimeMoniker::ALL
            .iter()
            .map(RuntimeMoniker::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownMoniker {
            value: value.into(),
            known,
        }
    }
}

/// Result type for gitbench-toolchain operations
pub type Result<T> = std::result::Result<T, Error>;
