use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use tracing::trace;
use walkdir::WalkDir;

use crate::error::ScanError;

/// Returns the directories under `root` whose relative path matches the
/// given wildcard segments, in lexicographic order.
///
/// Each segment is a glob over exactly one path component, so the match
/// depth equals the segment count. A missing or unreadable root yields an
/// empty result; the only hard failure is a segment that is not a valid
/// glob.
pub fn match_dirs(root: &Path, segments: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = segments.join("/");
    let matcher = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ScanError::Pattern {
            pattern: pattern.clone(),
            source,
        })?
        .compile_matcher();

    let depth = segments.len();
    let mut matches = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(depth)
        .max_depth(depth)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                trace!("match walk under {} skipped an entry: {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative) {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn matches_segments_at_exact_depth() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("host2/port-2:0")).expect("fixture");
        fs::create_dir_all(dir.path().join("host2/port-2:1")).expect("fixture");
        fs::create_dir_all(dir.path().join("host2/port-2:0/expander-2:0")).expect("fixture");
        fs::create_dir_all(dir.path().join("host2/power")).expect("fixture");

        let found = match_dirs(dir.path(), &["host*", "port-*"]).expect("match");
        assert_eq!(
            found,
            vec![
                dir.path().join("host2/port-2:0"),
                dir.path().join("host2/port-2:1"),
            ]
        );
    }

    #[test]
    fn wildcards_stay_within_one_component() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("a/b/c")).expect("fixture");

        // `*` must not cross the separator and match `a/b` as one segment.
        let found = match_dirs(dir.path(), &["*", "c"]).expect("match");
        assert!(found.is_empty());

        let found = match_dirs(dir.path(), &["*", "*", "c"]).expect("match");
        assert_eq!(found, vec![dir.path().join("a/b/c")]);
    }

    #[test]
    fn files_do_not_match() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("host2")).expect("fixture");
        fs::write(dir.path().join("host2/port-2:0"), "").expect("fixture");

        let found = match_dirs(dir.path(), &["host*", "port-*"]).expect("match");
        assert!(found.is_empty());
    }

    #[test]
    fn missing_root_yields_empty() {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().join("no-such-tree");

        let found = match_dirs(&root, &["host*"]).expect("match");
        assert!(found.is_empty());
    }

    #[test]
    fn empty_segment_list_yields_empty() {
        let dir = TempDir::new().expect("tempdir");

        let found = match_dirs(dir.path(), &[]).expect("match");
        assert!(found.is_empty());
    }

    #[test]
    fn results_come_back_sorted() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["host9", "host10", "host2"] {
            fs::create_dir_all(dir.path().join(name)).expect("fixture");
        }

        let found = match_dirs(dir.path(), &["host*"]).expect("match");
        assert_eq!(
            found,
            vec![
                dir.path().join("host10"),
                dir.path().join("host2"),
                dir.path().join("host9"),
            ]
        );
    }
}
