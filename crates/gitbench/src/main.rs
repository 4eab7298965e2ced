//! gitbench command line entry point

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod config;
mod errors;
mod tracing;

use crate::cli::parse;
use crate::commands::Command;
use crate::tracing::{TracingConfig, command_span};
use ::tracing::Instrument;

#[tokio::main]
async fn main() {
    if let Err(error) = run_main().await {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> miette::Result<()> {
    let cli = parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
        filter: cli.log_filter.clone(),
    })?;

    let command: Command = cli.command.into();
    let span = command_span(command.name());
    let output = commands::execute(command, cli.config.as_deref())
        .instrument(span)
        .await?;

    println!("{output}");
    Ok(())
}
