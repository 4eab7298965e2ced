use crate::errors::CliError;
use gitbench_snapshot::{Git, SnapshotConfig};
use std::path::Path;
use tracing::instrument;

#[instrument(skip(settings))]
pub async fn execute(
    settings: &SnapshotConfig,
    reference: &str,
    dir: &Path,
) -> Result<String, CliError> {
    let commit = Git::from_config(settings)
        .resolve_commit(reference, dir)
        .await?;
    Ok(commit)
}
