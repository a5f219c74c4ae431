use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{Diagnostic, SearchError, SearchResult};

/// A slice of the root directory assigned exclusively to one scan task.
///
/// Units form a true partition: every regular file reachable under the root
/// belongs to exactly one unit. Immediate subdirectories each become a
/// recursive `Subtree` unit; the files sitting directly in the root are
/// covered by the single non-recursive `TopLevel` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    /// An immediate subdirectory of the root, scanned recursively
    Subtree(PathBuf),
    /// The root itself, scanning only regular files directly inside it
    TopLevel(PathBuf),
}

impl WorkUnit {
    /// The directory this unit scans
    pub fn path(&self) -> &Path {
        match self {
            WorkUnit::Subtree(path) => path,
            WorkUnit::TopLevel(path) => path,
        }
    }
}

/// The work units derived from a root, plus any entries that could not be
/// classified along the way.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub units: Vec<WorkUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Splits the root into independent work units, one per immediate
/// subdirectory plus one for the root's own files.
///
/// Fails with `InvalidRoot` when the root does not exist or is not a
/// directory, and with `TraversalFailure` when the root cannot be listed
/// at all; the session degrades either into an empty result with a
/// diagnostic rather than letting it escape a search. A single entry that
/// cannot be classified becomes a diagnostic in the partition, never a
/// failure: the units discovered around it are kept.
pub fn partition(root: &Path) -> SearchResult<Partition> {
    if !root.is_dir() {
        return Err(SearchError::invalid_root(root));
    }

    let entries =
        fs::read_dir(root).map_err(|e| SearchError::traversal_failure(root, e.to_string()))?;

    let mut partition = Partition::default();
    for entry in entries {
        match entry.and_then(|e| Ok((e.file_type()?, e))) {
            Ok((file_type, entry)) => {
                // file_type() does not follow symlinks, so a symlinked
                // directory stays out of the subtree units and is skipped
                // like any other non-regular entry.
                if file_type.is_dir() {
                    partition.units.push(WorkUnit::Subtree(entry.path()));
                }
            }
            Err(err) => {
                warn!("Unreadable entry under {}: {}", root.display(), err);
                let err = SearchError::traversal_failure(root, err.to_string());
                partition.diagnostics.push(Diagnostic::from(&err));
            }
        }
    }
    partition.units.push(WorkUnit::TopLevel(root.to_path_buf()));

    debug!(
        "Partitioned {} into {} work units",
        root.display(),
        partition.units.len()
    );
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_partition_layout() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        File::create(dir.path().join("top.txt")).unwrap();

        let partition = partition(dir.path()).unwrap();
        assert_eq!(partition.units.len(), 3);
        assert!(partition.diagnostics.is_empty());

        let subtrees: Vec<_> = partition
            .units
            .iter()
            .filter(|u| matches!(u, WorkUnit::Subtree(_)))
            .collect();
        assert_eq!(subtrees.len(), 2);

        let top_level: Vec<_> = partition
            .units
            .iter()
            .filter(|u| matches!(u, WorkUnit::TopLevel(_)))
            .collect();
        assert_eq!(top_level.len(), 1);
        assert_eq!(top_level[0].path(), dir.path());
    }

    #[test]
    fn test_partition_empty_root() {
        let dir = tempdir().unwrap();
        let partition = partition(dir.path()).unwrap();
        // Even an empty root gets its top-level unit
        assert_eq!(partition.units.len(), 1);
        assert!(matches!(partition.units[0], WorkUnit::TopLevel(_)));
    }

    #[test]
    fn test_partition_missing_root() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("never-created");
        let result = partition(&gone);
        assert!(matches!(result, Err(SearchError::InvalidRoot(_))));
    }

    #[test]
    fn test_partition_root_is_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        File::create(&file_path).unwrap();
        let result = partition(&file_path);
        assert!(matches!(result, Err(SearchError::InvalidRoot(_))));
    }

    #[test]
    fn test_subdirectories_are_not_recursed_here() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("outer/inner")).unwrap();

        let partition = partition(dir.path()).unwrap();
        // Only the immediate child appears; nested directories belong to
        // its subtree scan.
        assert_eq!(partition.units.len(), 2);
        assert!(partition
            .units
            .contains(&WorkUnit::Subtree(dir.path().join("outer"))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_root_reports_its_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let sealed = dir.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        // Execute-only: the directory can be stat'ed but not listed
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o100)).unwrap();

        let result = partition(&sealed);
        // Root can list anything; only assert when the listing failed
        if let Err(err) = result {
            match err {
                SearchError::TraversalFailure { path, .. } => assert_eq!(path, sealed),
                other => panic!("unexpected error: {}", other),
            }
        }

        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
