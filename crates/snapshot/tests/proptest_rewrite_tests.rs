//! Property-based tests for descriptor path substitution

use gitbench_snapshot::{rewrite_descriptor, substitute_root};
use proptest::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Repository roots contain upper-case letters so they never occur in filler text
fn root_strategy() -> impl Strategy<Value = String> {
    "/WORK/[A-Z]{1,8}"
}

fn snapshot_strategy() -> impl Strategy<Value = String> {
    "/tmp/gitbench-snapshot-[a-z0-9]{6}"
}

fn filler_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 <>=\"./\n]{0,24}"
}

proptest! {
    #[test]
    fn substitution_replaces_every_occurrence(
        root in root_strategy(),
        snapshot in snapshot_strategy(),
        pieces in prop::collection::vec(filler_strategy(), 1..6),
    ) {
        let text = pieces.join(&root);
        let expected = pieces.join(&snapshot);

        let out = substitute_root(&text, &root, &snapshot);

        prop_assert_eq!(&out, &expected);
        prop_assert!(!out.contains(&root));
    }

    #[test]
    fn text_without_root_is_unchanged(
        root in root_strategy(),
        snapshot in snapshot_strategy(),
        text in filler_strategy(),
    ) {
        prop_assert_eq!(substitute_root(&text, &root, &snapshot), text);
    }

    #[test]
    fn substitution_is_reversible_for_distinct_paths(
        root in root_strategy(),
        snapshot in snapshot_strategy(),
        pieces in prop::collection::vec(filler_strategy(), 1..6),
    ) {
        let text = pieces.join(&root);
        let there = substitute_root(&text, &root, &snapshot);
        prop_assert_eq!(substitute_root(&there, &snapshot, &root), text);
    }

    #[test]
    fn rewrite_reports_occurrence_count(
        root in root_strategy(),
        pieces in prop::collection::vec(filler_strategy(), 1..6),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let dir = TempDir::new().unwrap();
        let descriptor = dir.path().join("Bench.csproj");
        std::fs::write(&descriptor, pieces.join(&root)).unwrap();

        let count = runtime
            .block_on(rewrite_descriptor(&descriptor, Path::new(&root), Path::new("/snap")))
            .unwrap();

        prop_assert_eq!(count, pieces.len() - 1);
        prop_assert_eq!(std::fs::read_to_string(&descriptor).unwrap(), pieces.join("/snap"));
    }
}
