//! Locating instance files by glob pattern.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::BatchError;

/// File patterns of the benchmark families, relative to the directory the
/// archives were extracted into.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "C1/BPPC_*.txt_*",
    "C3/BPPC_*.txt_*",
    "C10/BPPC_*.txt_*",
    "R3/BPPC_*.txt_*",
    "R10/BPPC_*.txt_*",
    "sparse_corr/test_*.dat",
    "sparse_rand/test_*.dat",
];

/// Expands every pattern below `root` and returns the matching files,
/// sorted and without duplicates.
///
/// Entries that cannot be read are skipped with a warning; a syntactically
/// invalid pattern is an error.
pub fn discover<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let entries = glob::glob(&full).map_err(|source| BatchError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("skipping unreadable entry: {e}"),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("C1")).unwrap();
        fs::create_dir(dir.path().join("sparse_rand")).unwrap();
        fs::write(dir.path().join("C1/BPPC_1_0_2.txt_2"), "").unwrap();
        fs::write(dir.path().join("C1/BPPC_1_0_1.txt_1"), "").unwrap();
        fs::write(dir.path().join("C1/notes.md"), "").unwrap();
        fs::write(dir.path().join("sparse_rand/test_500_1.dat"), "").unwrap();
        fs::create_dir(dir.path().join("sparse_rand/test_dir.dat")).unwrap();

        let files = discover(dir.path(), DEFAULT_PATTERNS).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            names,
            vec![
                "C1/BPPC_1_0_1.txt_1",
                "C1/BPPC_1_0_2.txt_2",
                "sparse_rand/test_500_1.dat"
            ]
        );
    }

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.dat"), "").unwrap();
        let files = discover(dir.path(), &["*.dat", "a.*"]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover(dir.path(), &["[unclosed"]),
            Err(BatchError::Pattern { .. })
        ));
    }

    #[test]
    fn test_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), DEFAULT_PATTERNS).unwrap().is_empty());
    }
}
