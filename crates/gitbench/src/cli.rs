use crate::commands::Command;
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitbench")]
#[command(about = "Benchmark your project as it was at any git branch, tag or commit")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Tracing filter directive, overrides --level and RUST_LOG"
    )]
    pub log_filter: Option<String>,

    #[arg(
        short = 'c',
        long,
        global = true,
        help = "Project configuration file (default: ./gitbench.toml when present)"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Log format after applying the `--json` shortcut
    pub const fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.log_format
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Clone the repository at a reference and point a project file at the clone")]
    Materialize {
        #[arg(long, short = 'd', help = "Generated project file to retarget")]
        descriptor: PathBuf,
        #[arg(
            long,
            short = 'r',
            help = "Branch, tag or commit to snapshot",
            default_value = "HEAD"
        )]
        reference: String,
        #[arg(long, help = "Directory to create the snapshot in")]
        snapshot_dir: Option<PathBuf>,
        #[arg(long, help = "Timeout for each git command, in seconds")]
        timeout: Option<u64>,
    },
    #[command(about = "Resolve a git reference to a commit id")]
    Resolve {
        #[arg(long, short = 'r', help = "Reference to resolve", default_value = "HEAD")]
        reference: String,
        #[arg(long, help = "Directory inside the repository", default_value = ".")]
        dir: PathBuf,
    },
    #[command(about = "Show the configured benchmark jobs")]
    Plan,
    #[command(about = "Show version information")]
    Version,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Materialize {
                descriptor,
                reference,
                snapshot_dir,
                timeout,
            } => Self::Materialize {
                descriptor,
                reference,
                snapshot_dir,
                timeout,
            },
            Commands::Resolve { reference, dir } => Self::Resolve { reference, dir },
            Commands::Plan => Self::Plan,
            Commands::Version => Self::Version,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
