use crate::errors::CliError;
use gitbench_snapshot::{Materializer, SnapshotConfig};
use std::path::Path;
use tracing::instrument;

#[instrument(skip(settings))]
pub async fn execute(
    settings: &SnapshotConfig,
    descriptor: &Path,
    reference: &str,
) -> Result<String, CliError> {
    let snapshot = Materializer::new(settings)
        .materialize(descriptor, reference)
        .await?;

    Ok(format!(
        "snapshot:   {}\ncommit:     {}\nrepository: {}\nreplaced:   {}",
        snapshot.directory.display(),
        snapshot.commit,
        snapshot.repository_root.display(),
        snapshot.replacements
    ))
}
