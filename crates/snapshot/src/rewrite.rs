//! Path substitution inside generated project descriptors

use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Replace every occurrence of `root` in `text` with `snapshot`.
///
/// Pure substring replacement; an empty `root` leaves the text untouched.
#[must_use]
pub fn substitute_root(text: &str, root: &str, snapshot: &str) -> String {
    if root.is_empty() {
        return text.to_string();
    }
    text.replace(root, snapshot)
}

/// Byte-level counterpart of [`substitute_root`].
///
/// Occurrences are matched left to right without overlap. Returns the new
/// contents and the number of replacements; every byte outside a match is
/// copied unchanged, whatever the file's encoding.
#[must_use]
pub fn substitute_root_bytes(text: &[u8], root: &[u8], snapshot: &[u8]) -> (Vec<u8>, usize) {
    if root.is_empty() {
        return (text.to_vec(), 0);
    }

    let mut out = Vec::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;
    while let Some(pos) = rest.windows(root.len()).position(|window| window == root) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(snapshot);
        rest = &rest[pos + root.len()..];
        count += 1;
    }
    out.extend_from_slice(rest);
    (out, count)
}

/// Rewrite the descriptor at `path` in place so that paths under `root`
/// point into `snapshot` instead.
///
/// Returns the number of occurrences that were replaced. The file is fully
/// overwritten even when nothing matched.
pub async fn rewrite_descriptor(path: &Path, root: &Path, snapshot: &Path) -> Result<usize> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| Error::descriptor(path, "read", e))?;

    let (rewritten, occurrences) = substitute_root_bytes(
        &contents,
        root.as_os_str().as_encoded_bytes(),
        snapshot.as_os_str().as_encoded_bytes(),
    );
    tokio::fs::write(path, rewritten)
        .await
        .map_err(|e| Error::descriptor(path, "write", e))?;

    if occurrences == 0 {
        warn!(
            descriptor = %path.display(),
            root = %root.display(),
            "Project descriptor does not reference the repository root"
        );
    } else {
        debug!(descriptor = %path.display(), occurrences, "Rewrote project descriptor");
    }

    Ok(occurrences)
}
